//! Command-line interface

use crate::{
    app::{AppConfig, PoseSource},
    config::Config,
    utils::normalize_degrees,
    Error, Result,
};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Convert a video of a person into a bone rotation animation
#[derive(Parser, Debug)]
#[command(name = "pose2anim")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").args(["video", "poses"])))]
pub struct Args {
    /// Video to run the pose detector on
    #[arg(short, long)]
    pub video: Option<PathBuf>,

    /// Folder of already detected keypoint files (skips detection)
    #[arg(long)]
    pub poses: Option<PathBuf>,

    /// Folder to put the results in
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// OpenPose folder containing bin and models
    #[arg(long)]
    pub openpose: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Index of the person to animate
    #[arg(short, long)]
    pub person: Option<usize>,

    /// Frames per second of the source [default: read from the video, else 30]
    #[arg(long)]
    pub fps: Option<f64>,

    /// Minimum keypoint confidence (0 to 1)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Lowest trembling frequency removed, in Hz (0 to disable)
    #[arg(long)]
    pub min_trembling_freq: Option<f64>,

    /// Multi-Line Fitting max error ratio (0 to disable)
    #[arg(long)]
    pub mlf_max_error_ratio: Option<f64>,

    /// Maximum keyframes per second (0 to disable)
    #[arg(long)]
    pub max_keys_per_sec: Option<usize>,

    /// Orientation of the body in the video, in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub body_orientation: Option<f64>,

    /// Print an example configuration file and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Load the configuration file, if any, and apply command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Config::from_file(path)?
            }
            None => Config::default(),
        };

        if let Some(openpose) = &self.openpose {
            config.detector.openpose_path = Some(openpose.clone());
        }
        if let Some(person) = self.person {
            config.person_index = person;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = Some(fps);
        }
        let processing = &mut config.processing;
        if let Some(value) = self.min_confidence {
            processing.min_confidence = value;
        }
        if let Some(value) = self.min_trembling_freq {
            processing.min_trembling_freq = value;
        }
        if let Some(value) = self.mlf_max_error_ratio {
            processing.mlf_max_error_ratio = value;
        }
        if let Some(value) = self.max_keys_per_sec {
            processing.max_keys_per_sec = value;
        }
        if let Some(value) = self.body_orientation {
            processing.body_orientation = normalize_degrees(value);
        }

        Ok(config)
    }

    /// Build the application configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no input was given or the configuration cannot be loaded
    pub fn app_config(&self) -> Result<AppConfig> {
        let source = match (&self.video, &self.poses) {
            (Some(video), _) => PoseSource::Video(video.clone()),
            (None, Some(poses)) => PoseSource::Poses(poses.clone()),
            (None, None) => {
                return Err(Error::InvalidInput(
                    "Either --video or --poses must be given".to_string(),
                ))
            }
        };

        Ok(AppConfig {
            source,
            output_folder: self.output.clone(),
            config: self.load_config()?,
        })
    }
}
