//! Time alignment of power readings with trackpoints.

pub mod elapsed;
pub mod engine;
pub mod types;

pub use elapsed::{elapsed_time, ElapsedTime};
pub use engine::fuse_power;
pub use types::{FusionReport, SkippedPoint};
