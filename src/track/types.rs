//! Track document types.

use crate::track::xml::{Element, XmlDocument};

/// Namespace of the Garmin activity extension carrying trackpoint power.
pub const NS_TPX: &str = "http://www.garmin.com/xmlschemas/ActivityExtension/v2";

/// Element names along the activity → trackpoint path.
pub const ROOT: &str = "TrainingCenterDatabase";
pub const ACTIVITIES: &str = "Activities";
pub const ACTIVITY: &str = "Activity";
pub const LAP: &str = "Lap";
pub const TRACK: &str = "Track";
pub const TRACKPOINT: &str = "Trackpoint";
pub const TIME: &str = "Time";
pub const EXTENSIONS: &str = "Extensions";

/// Power reading to attach to one trackpoint.
///
/// Built fresh for every matched trackpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionBlock {
    pub watts: String,
}

impl ExtensionBlock {
    pub fn new(watts: impl Into<String>) -> Self {
        Self {
            watts: watts.into(),
        }
    }

    /// `<Extensions><TPX xmlns="..."><Watts>..</Watts></TPX></Extensions>`
    pub fn to_element(&self) -> Element {
        Element::new(EXTENSIONS).with_child(
            Element::new("TPX")
                .with_attribute("xmlns", NS_TPX)
                .with_child(Element::new("Watts").with_text(self.watts.as_str())),
        )
    }
}

/// A TCX document whose single activity/lap/track path has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDocument {
    document: XmlDocument,
}

impl TrackDocument {
    /// Wrap a document already checked by the loader.
    pub(crate) fn from_validated(document: XmlDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    pub fn into_document(self) -> XmlDocument {
        self.document
    }

    fn track(&self) -> Option<&Element> {
        self.document
            .root
            .child(ACTIVITIES)?
            .child(ACTIVITY)?
            .child(LAP)?
            .child(TRACK)
    }

    fn track_mut(&mut self) -> Option<&mut Element> {
        self.document
            .root
            .elements_named_mut(ACTIVITIES)
            .next()?
            .elements_named_mut(ACTIVITY)
            .next()?
            .elements_named_mut(LAP)
            .next()?
            .elements_named_mut(TRACK)
            .next()
    }

    /// Trackpoints in document order.
    pub fn trackpoints(&self) -> Vec<&Element> {
        self.track()
            .map(|track| track.elements_named(TRACKPOINT).collect())
            .unwrap_or_default()
    }

    /// Mutable trackpoints in document order.
    pub fn trackpoints_mut(&mut self) -> Vec<&mut Element> {
        self.track_mut()
            .map(|track| track.elements_named_mut(TRACKPOINT).collect())
            .unwrap_or_default()
    }

    pub fn trackpoint_count(&self) -> usize {
        self.trackpoints().len()
    }
}

/// Attach (or replace) the power extension on a trackpoint.
pub fn attach_extension(trackpoint: &mut Element, block: &ExtensionBlock) {
    trackpoint.replace_or_push(block.to_element());
}

/// Power value carried by a trackpoint's extension, if any.
pub fn trackpoint_watts(trackpoint: &Element) -> Option<String> {
    trackpoint
        .child(EXTENSIONS)?
        .child("TPX")?
        .child("Watts")
        .map(Element::text)
}
