//! Invocation of the external OpenPose detector.
//!
//! The detector is run as a single blocking process that writes one
//! keypoint file per video frame into an output directory. It has to run
//! from its own folder to find its models, so the child process gets that
//! folder as working directory and every path handed to it is absolute.

use crate::{config::DetectorConfig, Error, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs the pose detector on a video
#[derive(Debug, Clone)]
pub struct PoseDetector {
    openpose_dir: PathBuf,
    executable: PathBuf,
    keypoint_scale: u32,
}

impl PoseDetector {
    /// Create a detector rooted at an OpenPose folder
    ///
    /// # Errors
    ///
    /// Returns an error if the folder or its executable does not exist
    pub fn new<P: AsRef<Path>>(openpose_dir: P, config: &DetectorConfig) -> Result<Self> {
        let openpose_dir = openpose_dir.as_ref();
        if !openpose_dir.is_dir() {
            return Err(Error::ConfigError(format!(
                "OpenPose folder not found: {}",
                openpose_dir.display()
            )));
        }
        let openpose_dir = fs::canonicalize(openpose_dir)?;
        if !openpose_dir.join(&config.executable).is_file() {
            return Err(Error::ConfigError(format!(
                "OpenPose folder {} does not contain {}",
                openpose_dir.display(),
                config.executable.display()
            )));
        }

        Ok(Self {
            openpose_dir,
            executable: config.executable.clone(),
            keypoint_scale: config.keypoint_scale,
        })
    }

    /// Command line that processes `video` into `output_dir`
    #[must_use]
    pub fn command(&self, video: &Path, output_dir: &Path) -> Command {
        let mut command = Command::new(self.openpose_dir.join(&self.executable));
        command
            .current_dir(&self.openpose_dir)
            .arg("--keypoint_scale")
            .arg(self.keypoint_scale.to_string())
            .arg("--video")
            .arg(video)
            .arg("--write_json")
            .arg(output_dir);
        command
    }

    /// Detect the poses of every frame of `video`, writing them to `output_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the video is missing, the detector cannot be
    /// started, or it exits unsuccessfully
    pub fn detect(&self, video: &Path, output_dir: &Path) -> Result<()> {
        let video = fs::canonicalize(video)?;
        fs::create_dir_all(output_dir)?;
        let output_dir = fs::canonicalize(output_dir)?;

        info!(
            "Running pose detector on {} into {}",
            video.display(),
            output_dir.display()
        );
        let mut command = self.command(&video, &output_dir);
        let status = command.status().map_err(|source| Error::DetectorLaunch {
            program: self.openpose_dir.join(&self.executable),
            source,
        })?;

        if !status.success() {
            return Err(Error::DetectorFailed { status });
        }
        info!("Pose detection finished");
        Ok(())
    }
}
