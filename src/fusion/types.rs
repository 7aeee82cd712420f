//! Fusion results.

use chrono::NaiveDateTime;
use std::fmt;

/// A trackpoint with no matching power log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPoint {
    /// Index of the trackpoint in the track
    pub position: usize,
    /// Absolute trackpoint time
    pub timestamp: NaiveDateTime,
    /// Elapsed time text (`H:MM:SS`)
    pub elapsed: String,
}

impl fmt::Display for SkippedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (elapsed {})",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.elapsed
        )
    }
}

/// Outcome of attaching power to a track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FusionReport {
    /// Trackpoints visited
    pub total: usize,
    /// Trackpoints that received a power extension
    pub matched: usize,
    /// Trackpoints left untouched, in track order
    pub skipped: Vec<SkippedPoint>,
}

impl FusionReport {
    /// Fraction of trackpoints that received power (0.0-1.0).
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.matched as f64 / self.total as f64
    }
}
