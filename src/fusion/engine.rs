//! Attach power readings to trackpoints.

use crate::error::MergeError;
use crate::fusion::elapsed::elapsed_time;
use crate::fusion::types::{FusionReport, SkippedPoint};
use crate::power::PowerIndex;
use crate::track::loader::trackpoint_time;
use crate::track::types::{attach_extension, ExtensionBlock, TrackDocument};
use chrono::NaiveDateTime;

/// Walk the trackpoints in order and attach the power reading whose log key
/// matches each trackpoint's elapsed time.
///
/// Misses are recorded in the report and leave the trackpoint untouched. A
/// malformed timestamp aborts with a format error.
pub fn fuse_power(
    track: &mut TrackDocument,
    index: &PowerIndex,
    start: NaiveDateTime,
) -> Result<FusionReport, MergeError> {
    let mut report = FusionReport::default();

    for (position, trackpoint) in track.trackpoints_mut().into_iter().enumerate() {
        report.total += 1;

        let timestamp = trackpoint_time(trackpoint, position)?;
        let elapsed = elapsed_time(start, timestamp);

        let watts = elapsed.key.as_deref().and_then(|key| index.get(key));
        match watts {
            Some(watts) => {
                attach_extension(trackpoint, &ExtensionBlock::new(watts));
                report.matched += 1;
            }
            None => {
                tracing::debug!(
                    position,
                    %timestamp,
                    elapsed = %elapsed.text,
                    "No power reading for trackpoint"
                );
                report.skipped.push(SkippedPoint {
                    position,
                    timestamp,
                    elapsed: elapsed.text,
                });
            }
        }
    }

    tracing::info!(
        total = report.total,
        matched = report.matched,
        skipped = report.skipped.len(),
        "Fused power into track"
    );

    Ok(report)
}
