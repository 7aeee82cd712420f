//! WattMerge - power log to TCX merger
//!
//! Attaches per-second power readings from a companion CSV export to the
//! trackpoints of a TCX workout file, so platforms that read TCX power
//! extensions see the ride's Watts.

pub mod error;
pub mod fusion;
pub mod pipeline;
pub mod power;
pub mod storage;
pub mod track;

// Re-export commonly used types
pub use error::MergeError;
pub use fusion::{fuse_power, FusionReport, SkippedPoint};
pub use pipeline::{merge_content, run, MergePaths, MergeSummary};
pub use power::{build_power_index, PowerIndex};
pub use storage::config::MergeConfig;
pub use track::{load_track, render_track, TrackDocument};
