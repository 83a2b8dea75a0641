//! Tests for command-line argument parsing

use clap::Parser;
use pose2anim::{app::PoseSource, cli::Args, constants::DEFAULT_MIN_CONFIDENCE, Error};
use std::path::PathBuf;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("pose2anim").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_default_arguments() {
    let args = parse(&["--video", "dance.mp4"]);
    assert_eq!(args.video, Some(PathBuf::from("dance.mp4")));
    assert_eq!(args.output, PathBuf::from("."));
    assert!(!args.debug);
    assert!(!args.print_config);

    let config = args.load_config().unwrap();
    assert_eq!(config.processing.min_confidence, DEFAULT_MIN_CONFIDENCE);
    // Without --fps the rate stored in the video is used
    assert_eq!(config.frame_rate, None);
}

#[test]
fn test_video_and_poses_conflict() {
    let result = Args::try_parse_from(["pose2anim", "--video", "a.mp4", "--poses", "Poses"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_source_is_rejected() {
    let args = parse(&["--output", "out"]);
    assert!(matches!(args.app_config(), Err(Error::InvalidInput(_))));
}

#[test]
fn test_overrides_are_applied() {
    let args = parse(&[
        "--poses",
        "cache/walk",
        "-o",
        "anims",
        "--openpose",
        "/opt/openpose",
        "--person",
        "1",
        "--fps",
        "25",
        "--min-confidence",
        "0.4",
        "--min-trembling-freq",
        "0",
        "--mlf-max-error-ratio",
        "0.05",
        "--max-keys-per-sec",
        "8",
        "--body-orientation",
        "-90",
    ]);
    let app = args.app_config().unwrap();

    assert_eq!(app.source, PoseSource::Poses(PathBuf::from("cache/walk")));
    assert_eq!(app.output_folder, PathBuf::from("anims"));

    let config = app.config;
    assert_eq!(config.detector.openpose_path, Some(PathBuf::from("/opt/openpose")));
    assert_eq!(config.person_index, 1);
    assert_eq!(config.frame_rate, Some(25.0));
    assert_eq!(config.processing.min_confidence, 0.4);
    assert_eq!(config.processing.min_trembling_freq, 0.0);
    assert_eq!(config.processing.mlf_max_error_ratio, 0.05);
    assert_eq!(config.processing.max_keys_per_sec, 8);
    assert_eq!(config.processing.body_orientation, 270.0);
}

#[test]
fn test_config_file_then_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "frame_rate: 24\nprocessing:\n  min_confidence: 0.3\n").unwrap();

    let path_arg = path.to_string_lossy().into_owned();
    let args = parse(&["--video", "a.mp4", "-C", &path_arg, "--min-confidence", "0.5"]);
    let config = args.load_config().unwrap();
    assert_eq!(config.frame_rate, Some(24.0));
    assert_eq!(config.processing.min_confidence, 0.5);
}

#[test]
fn test_invalid_number_is_rejected() {
    let result = Args::try_parse_from(["pose2anim", "--video", "a.mp4", "--max-keys-per-sec", "-3"]);
    assert!(result.is_err());
}
