//! Integration tests for the file-based merge pipeline.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wattmerge::storage::config::load_config;
use wattmerge::track::types::trackpoint_watts;
use wattmerge::{load_track, run, MergeConfig, MergeError, MergePaths};

const POWER_LOG: &str = "Stages Cycling\n\
English,mph,miles,watts\n\
Time,Speed,Distance,Watts\n\
00:00,0.0,0.00,0\n\
00:01,12.1,0.00,150\n\
00:02,12.3,0.01,160\n";

const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2">
  <Activities>
    <Activity Sport="Biking">
      <Id>2024-03-10T08:00:00.000Z</Id>
      <Lap StartTime="2024-03-10T08:00:00.000Z">
        <TotalTimeSeconds>5</TotalTimeSeconds>
        <Track>
          <Trackpoint>
            <Time>2024-03-10T08:00:00.000Z</Time>
            <DistanceMeters>0.0</DistanceMeters>
          </Trackpoint>
          <Trackpoint>
            <Time>2024-03-10T08:00:01.000Z</Time>
            <DistanceMeters>5.4</DistanceMeters>
          </Trackpoint>
          <Trackpoint>
            <Time>2024-03-10T08:00:02.000Z</Time>
            <DistanceMeters>10.9</DistanceMeters>
          </Trackpoint>
          <Trackpoint>
            <Time>2024-03-10T08:00:05.000Z</Time>
            <DistanceMeters>27.3</DistanceMeters>
          </Trackpoint>
        </Track>
      </Lap>
    </Activity>
  </Activities>
</TrainingCenterDatabase>"#;

fn write_inputs(dir: &Path, power_log: &str, track: &str) -> MergePaths {
    let basename = dir.join("workout");
    let paths = MergePaths::from_basename(&basename, "-combined");
    fs::write(&paths.power_log, power_log).unwrap();
    fs::write(&paths.track, track).unwrap();
    paths
}

#[test]
fn test_full_merge_flow() {
    let dir = TempDir::new().unwrap();
    let paths = write_inputs(dir.path(), POWER_LOG, TRACK);

    let summary = run(&paths, &MergeConfig::default()).unwrap();

    assert_eq!(summary.output, dir.path().join("workout-combined.tcx"));
    assert_eq!(summary.power_entries, 3);
    assert_eq!(summary.report.total, 4);
    assert_eq!(summary.report.matched, 3);
    assert_eq!(summary.report.skipped.len(), 1);
    assert_eq!(summary.report.skipped[0].elapsed, "0:00:05");

    let written = fs::read_to_string(&summary.output).unwrap();
    let (track, _) = load_track(&written).unwrap();
    let watts: Vec<Option<String>> = track
        .trackpoints()
        .into_iter()
        .map(trackpoint_watts)
        .collect();
    assert_eq!(
        watts,
        vec![
            Some("0".to_string()),
            Some("150".to_string()),
            Some("160".to_string()),
            None
        ]
    );
}

#[test]
fn test_inputs_left_unmodified() {
    let dir = TempDir::new().unwrap();
    let paths = write_inputs(dir.path(), POWER_LOG, TRACK);

    run(&paths, &MergeConfig::default()).unwrap();

    assert_eq!(fs::read_to_string(&paths.track).unwrap(), TRACK);
    assert_eq!(fs::read_to_string(&paths.power_log).unwrap(), POWER_LOG);
}

#[test]
fn test_malformed_row_writes_no_output() {
    let dir = TempDir::new().unwrap();
    let paths = write_inputs(dir.path(), "Time,a,b,Watts\n00:01,1,1\n", TRACK);

    let err = run(&paths, &MergeConfig::default()).unwrap_err();

    match &err {
        MergeError::Format { location, .. } => {
            assert!(location.contains("workout.csv"));
            assert!(location.contains("line 2"));
        }
        other => panic!("expected format error, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 3);
    assert!(!paths.output.exists());
}

#[test]
fn test_lenient_config_tolerates_malformed_row() {
    let dir = TempDir::new().unwrap();
    let paths = write_inputs(dir.path(), &format!("{}trailer\n", POWER_LOG), TRACK);
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[power_log]\nskip_malformed_rows = true\n").unwrap();

    let config = load_config(Some(config_path.as_path())).unwrap();
    let summary = run(&paths, &config).unwrap();

    assert_eq!(summary.rejected_rows, 1);
    assert!(paths.output.exists());
}

#[test]
fn test_structure_error_writes_no_output() {
    let dir = TempDir::new().unwrap();
    let track = TRACK.replace("<Lap StartTime", "<Lap/><Lap StartTime");
    let paths = write_inputs(dir.path(), POWER_LOG, &track);

    let err = run(&paths, &MergeConfig::default()).unwrap_err();

    assert!(matches!(err, MergeError::Structure { .. }));
    assert_eq!(err.exit_code(), 4);
    assert!(!paths.output.exists());
}

#[test]
fn test_bad_trackpoint_time_writes_no_output() {
    let dir = TempDir::new().unwrap();
    let track = TRACK.replace("08:00:02.000Z", "08:00:02Z");
    let paths = write_inputs(dir.path(), POWER_LOG, &track);

    match run(&paths, &MergeConfig::default()) {
        Err(MergeError::Format { location, .. }) => {
            assert!(location.contains("workout.tcx"));
            assert!(location.contains("trackpoint 2"));
        }
        other => panic!("expected format error, got {:?}", other),
    }
    assert!(!paths.output.exists());
}

#[test]
fn test_missing_track_is_io_error() {
    let dir = TempDir::new().unwrap();
    let paths = write_inputs(dir.path(), POWER_LOG, TRACK);
    fs::remove_file(&paths.track).unwrap();

    let err = run(&paths, &MergeConfig::default()).unwrap_err();

    assert!(matches!(err, MergeError::Io { .. }));
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn test_custom_suffix() {
    let dir = TempDir::new().unwrap();
    let mut config = MergeConfig::default();
    config.output.suffix = "-watts".to_string();

    let paths = MergePaths::from_basename(&dir.path().join("workout"), &config.output.suffix);
    fs::write(&paths.power_log, POWER_LOG).unwrap();
    fs::write(&paths.track, TRACK).unwrap();

    let summary = run(&paths, &config).unwrap();
    assert_eq!(summary.output, dir.path().join("workout-watts.tcx"));
}

#[test]
fn test_rerun_overwrites_with_same_result() {
    let dir = TempDir::new().unwrap();
    let paths = write_inputs(dir.path(), POWER_LOG, TRACK);

    let first = run(&paths, &MergeConfig::default()).unwrap();
    let first_content = fs::read_to_string(&first.output).unwrap();
    let second = run(&paths, &MergeConfig::default()).unwrap();
    let second_content = fs::read_to_string(&second.output).unwrap();

    assert_eq!(first.report, second.report);
    assert_eq!(first_content, second_content);
}
