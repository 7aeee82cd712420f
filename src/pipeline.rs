//! End-to-end merge: power log + track → combined track.
//!
//! Stages run strictly in order: index build, track load, fusion,
//! serialization. The combined file is only created once every earlier
//! stage has succeeded.

use crate::error::MergeError;
use crate::fusion::{fuse_power, FusionReport};
use crate::power::{build_power_index, PowerIndex};
use crate::storage::config::MergeConfig;
use crate::track::{load_track, render_track, write_track_to_file};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Input and output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePaths {
    pub power_log: PathBuf,
    pub track: PathBuf,
    pub output: PathBuf,
}

impl MergePaths {
    /// Derive `<base>.csv`, `<base>.tcx` and `<base><suffix>.tcx`.
    ///
    /// Extensions are appended, so dots already in the basename are kept.
    pub fn from_basename(basename: &Path, suffix: &str) -> Self {
        Self {
            power_log: with_appended(basename, ".csv"),
            track: with_appended(basename, ".tcx"),
            output: with_appended(basename, &format!("{}.tcx", suffix)),
        }
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }
}

fn with_appended(base: &Path, tail: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(tail);
    PathBuf::from(name)
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct MergeSummary {
    /// Path of the written combined file
    pub output: PathBuf,
    /// Entries in the power index
    pub power_entries: usize,
    /// Power log rows dropped in lenient mode
    pub rejected_rows: usize,
    pub report: FusionReport,
}

/// Merge in memory: returns the combined TCX text and the fusion report.
pub fn merge_content(
    power_log: &str,
    track: &str,
    config: &MergeConfig,
) -> Result<(String, PowerIndex, FusionReport), MergeError> {
    let index = build_power_index(power_log, &config.power_log)?;
    let (mut document, start) = load_track(track)?;
    let report = fuse_power(&mut document, &index, start)?;
    let content = render_track(&document, config.output.indent)?;
    Ok((content, index, report))
}

fn read_input(path: &Path) -> Result<String, MergeError> {
    std::fs::read_to_string(path).map_err(|e| MergeError::io(path, e))
}

/// Run the merge against files on disk.
pub fn run(paths: &MergePaths, config: &MergeConfig) -> Result<MergeSummary, MergeError> {
    tracing::info!(
        power_log = %paths.power_log.display(),
        track = %paths.track.display(),
        "Merging power into track"
    );

    let power_log = read_input(&paths.power_log)?;
    let index = build_power_index(&power_log, &config.power_log)
        .map_err(|e| e.in_file(&paths.power_log))?;

    let track = read_input(&paths.track)?;
    let (mut document, start) = load_track(&track).map_err(|e| e.in_file(&paths.track))?;

    let report =
        fuse_power(&mut document, &index, start).map_err(|e| e.in_file(&paths.track))?;

    write_track_to_file(&document, &paths.output, config.output.indent)?;

    Ok(MergeSummary {
        output: paths.output.clone(),
        power_entries: index.len(),
        rejected_rows: index.rejected_rows.len(),
        report,
    })
}
