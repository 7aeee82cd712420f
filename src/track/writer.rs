//! TCX serialization.

use crate::error::MergeError;
use crate::track::types::TrackDocument;
use std::path::Path;

/// Render a track document to TCX text.
pub fn render_track(track: &TrackDocument, indent: usize) -> Result<String, MergeError> {
    track.document().to_xml_string(indent)
}

/// Render a track document and write it to a file.
///
/// The document is rendered in full before the file is created, so a
/// rendering failure never leaves a truncated file behind.
pub fn write_track_to_file(
    track: &TrackDocument,
    path: &Path,
    indent: usize,
) -> Result<(), MergeError> {
    let content = render_track(track, indent)?;
    std::fs::write(path, content).map_err(|e| MergeError::io(path, e))?;
    tracing::info!(path = %path.display(), "Wrote combined track");
    Ok(())
}
