//! Main application module: video or cached poses in, `.anim` file out.

use crate::{
    anim_writer::write_anim,
    bones::BoneHierarchy,
    config::Config,
    constants::{ANIMATIONS_FOLDER_NAME, ANIM_FILE_EXTENSION, POSES_FOLDER_NAME},
    detector::PoseDetector,
    extraction::{AngleExtractor, PoseReader},
    pipeline::{AnimationClip, Pipeline},
    video::{probe_frame_rate, resolve_frame_rate},
    Error, Result,
};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the keypoints come from
#[derive(Debug, Clone, PartialEq)]
pub enum PoseSource {
    /// Video to run the detector on. Detector output is cached next to the
    /// animation and reused on later runs.
    Video(PathBuf),
    /// Folder that already holds detector frame files
    Poses(PathBuf),
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Input
    pub source: PoseSource,
    /// Folder receiving the results
    pub output_folder: PathBuf,
    /// Processing configuration
    pub config: Config,
}

/// Files produced or consumed by a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    /// Folder of detector frame files
    pub poses_dir: PathBuf,
    /// Animation file to write
    pub anim_path: PathBuf,
}

fn stem_of(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| Error::InvalidInput(format!("Cannot derive a name from {}", path.display())))
}

impl AppConfig {
    /// Resolve the input and output locations of this run
    ///
    /// # Errors
    ///
    /// Returns an error if no clip name can be derived from the input path
    pub fn paths(&self) -> Result<RunPaths> {
        let person = self.config.person_index;
        match &self.source {
            PoseSource::Video(video) => {
                let name = stem_of(video)?;
                let clip_dir = self.output_folder.join(&name);
                Ok(RunPaths {
                    poses_dir: clip_dir.join(POSES_FOLDER_NAME),
                    anim_path: clip_dir
                        .join(ANIMATIONS_FOLDER_NAME)
                        .join(format!("{name}{person}.{ANIM_FILE_EXTENSION}")),
                })
            }
            PoseSource::Poses(dir) => {
                let name = stem_of(dir)?;
                Ok(RunPaths {
                    poses_dir: dir.clone(),
                    anim_path: self
                        .output_folder
                        .join(format!("{name}{person}.{ANIM_FILE_EXTENSION}")),
                })
            }
        }
    }

    /// Frames per second used to timestamp the poses. The video is only
    /// opened when no rate is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the video's frame rate cannot be read
    pub fn frame_rate(&self) -> Result<f64> {
        let configured = self.config.frame_rate;
        let probed = match (&self.source, configured) {
            (PoseSource::Video(video), None) => probe_frame_rate(video)?,
            _ => None,
        };
        Ok(resolve_frame_rate(configured, probed))
    }
}

/// Main application struct
pub struct Pose2AnimApp {
    config: AppConfig,
    hierarchy: BoneHierarchy,
    pipeline: Pipeline,
}

impl Pose2AnimApp {
    /// Create the application, validating the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or bone definitions are invalid
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing pose to animation converter");
        config.config.validate()?;

        let hierarchy = BoneHierarchy::new(&config.config.bones)?;
        let pipeline = Pipeline::from_config(&config.config.processing)?;
        info!(
            "{} bones, stages: {:?}",
            hierarchy.len(),
            pipeline.stage_names()
        );

        Ok(Self {
            config,
            hierarchy,
            pipeline,
        })
    }

    /// Run detection if needed, then convert and write the animation
    ///
    /// # Errors
    ///
    /// Returns an error if detection, reading or writing fails. Nothing is
    /// written when detection fails.
    pub fn run(&self) -> Result<AnimationClip> {
        let paths = self.config.paths()?;

        if let PoseSource::Video(video) = &self.config.source {
            if paths.poses_dir.exists() {
                info!("Reusing detected poses in {}", paths.poses_dir.display());
            } else {
                self.detect(video, &paths.poses_dir)?;
            }
        }

        let clip = self.convert(&paths.poses_dir)?;
        write_anim(&clip, &paths.anim_path)?;
        Ok(clip)
    }

    /// Convert a folder of detector frame files into an animation clip
    ///
    /// # Errors
    ///
    /// Returns an error if the folder or a frame file cannot be read
    pub fn convert(&self, poses_dir: &Path) -> Result<AnimationClip> {
        let extractor = AngleExtractor::new(self.hierarchy.clone(), self.config.config.extraction_settings());
        let reader = PoseReader::new(extractor, self.config.frame_rate()?)?;
        let poses = reader.read_dir(poses_dir)?;

        let clip = self.pipeline.process(&self.hierarchy, poses);
        info!(
            "Animation has {} curves, {} keys, {:.2}s",
            clip.curves.len(),
            clip.keyframe_count(),
            clip.duration
        );
        if clip.curves.is_empty() {
            warn!("No bone was detected with enough confidence");
        }
        Ok(clip)
    }

    fn detect(&self, video: &Path, poses_dir: &Path) -> Result<()> {
        let openpose_dir = self.config.config.detector.openpose_path.as_ref().ok_or_else(|| {
            Error::ConfigError("openpose_path must be set to detect poses from a video".to_string())
        })?;
        let detector = PoseDetector::new(openpose_dir, &self.config.config.detector)?;

        detector.detect(video, poses_dir).map_err(|err| {
            // A half-written folder would be mistaken for cached poses next time
            if poses_dir.exists() {
                if let Err(e) = fs::remove_dir_all(poses_dir) {
                    warn!("Failed to clean up {}: {}", poses_dir.display(), e);
                }
            }
            err
        })
    }
}
