//! TCX loading and path validation.

use crate::error::MergeError;
use crate::track::types::{
    TrackDocument, ACTIVITIES, ACTIVITY, LAP, ROOT, TIME, TRACK, TRACKPOINT,
};
use crate::track::xml::{Element, XmlDocument};
use chrono::NaiveDateTime;

/// Trackpoint timestamp layout; the fraction must be 1-6 digits.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parse a trackpoint timestamp such as `2024-01-01T10:00:00.000Z`.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, String> {
    let fraction = text
        .strip_suffix('Z')
        .and_then(|body| body.rsplit_once('.'))
        .map(|(_, fraction)| fraction);

    match fraction {
        Some(f) if (1..=6).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()) => {}
        _ => {
            return Err(format!(
                "timestamp {:?} does not match YYYY-MM-DDTHH:MM:SS.ffffffZ",
                text
            ))
        }
    }

    NaiveDateTime::parse_from_str(text, TIME_FORMAT)
        .map_err(|e| format!("timestamp {:?} is invalid: {}", text, e))
}

/// Read and parse the `Time` child of a trackpoint.
pub fn trackpoint_time(
    trackpoint: &Element,
    position: usize,
) -> Result<NaiveDateTime, MergeError> {
    let location = format!("trackpoint {}", position);
    let time = trackpoint
        .child(TIME)
        .ok_or_else(|| MergeError::structure(location.as_str(), "missing Time element"))?;

    parse_timestamp(time.text().trim()).map_err(|message| MergeError::format(location, message))
}

/// Require exactly one child element with the given local name.
fn single_child<'a>(
    parent: &'a Element,
    local: &'a str,
    path: &str,
) -> Result<&'a Element, MergeError> {
    let mut matches = parent.elements_named(local);
    let first = matches
        .next()
        .ok_or_else(|| MergeError::structure(path, format!("missing {} element", local)))?;

    if matches.next().is_some() {
        return Err(MergeError::structure(
            path,
            format!("expected a single {} element", local),
        ));
    }

    Ok(first)
}

/// Load a TCX document and return it with the first trackpoint's time.
pub fn load_track(content: &str) -> Result<(TrackDocument, NaiveDateTime), MergeError> {
    let document = XmlDocument::parse(content)?;

    if document.root.local_name() != ROOT {
        return Err(MergeError::structure(
            "root",
            format!("expected {}, found {}", ROOT, document.root.name),
        ));
    }

    let activities = single_child(&document.root, ACTIVITIES, ROOT)?;
    let activity = single_child(activities, ACTIVITY, "Activities")?;
    let lap = single_child(activity, LAP, "Activities/Activity")?;
    let track = single_child(lap, TRACK, "Activities/Activity/Lap")?;

    let first = track.elements_named(TRACKPOINT).next().ok_or_else(|| {
        MergeError::structure("Activities/Activity/Lap/Track", "track has no trackpoints")
    })?;
    let start = trackpoint_time(first, 0)?;

    tracing::debug!(
        trackpoints = track.elements_named(TRACKPOINT).count(),
        %start,
        "Loaded track document"
    );

    Ok((TrackDocument::from_validated(document), start))
}
