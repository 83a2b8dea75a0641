//! Configuration management for the pose to animation converter

use crate::{
    bones::{default_bones, resolve_hierarchy, BoneDefinition},
    constants::{
        DEFAULT_BODY_ORIENTATION, DEFAULT_MAX_KEYS_PER_SEC, DEFAULT_MIN_CONFIDENCE,
        DEFAULT_MIN_TREMBLING_FREQ, DEFAULT_MLF_MAX_ERROR_RATIO, DEFAULT_PERSON_INDEX,
        OPENPOSE_KEYPOINT_SCALE, OPENPOSE_RELATIVE_EXE_PATH,
    },
    extraction::ExtractionSettings,
    utils::normalize_degrees,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pose detector configuration
    pub detector: DetectorConfig,

    /// Series processing configuration
    pub processing: ProcessingConfig,

    /// Bones of the animated rig
    pub bones: Vec<BoneDefinition>,

    /// Person of each frame to animate
    pub person_index: usize,

    /// Frames per second of the source. Overrides the rate stored in a
    /// video; poses folders without it are read at the default rate.
    pub frame_rate: Option<f64>,
}

/// External pose detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// OpenPose folder, containing `bin` and `models`
    pub openpose_path: Option<PathBuf>,

    /// Detector executable, relative to the OpenPose folder
    pub executable: PathBuf,

    /// Keypoint scale mode passed to the detector
    pub keypoint_scale: u32,
}

/// Angle extraction and smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Minimum keypoint confidence (0.0-1.0)
    pub min_confidence: f64,

    /// Lowest oscillation frequency removed as trembling, in Hz (0 disables)
    pub min_trembling_freq: f64,

    /// Multi-Line Fitting error as a fraction of the value range (0 disables)
    pub mlf_max_error_ratio: f64,

    /// Maximum keyframes per second (0 disables)
    pub max_keys_per_sec: usize,

    /// Orientation of the body in the image, in degrees (90 = upright)
    pub body_orientation: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            processing: ProcessingConfig::default(),
            bones: default_bones(),
            person_index: DEFAULT_PERSON_INDEX,
            frame_rate: None,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            openpose_path: None,
            executable: PathBuf::from(OPENPOSE_RELATIVE_EXE_PATH),
            keypoint_scale: OPENPOSE_KEYPOINT_SCALE,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_trembling_freq: DEFAULT_MIN_TREMBLING_FREQ,
            mlf_max_error_ratio: DEFAULT_MLF_MAX_ERROR_RATIO,
            max_keys_per_sec: DEFAULT_MAX_KEYS_PER_SEC,
            body_orientation: DEFAULT_BODY_ORIENTATION,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.processing.body_orientation = normalize_degrees(config.processing.body_orientation);
        Ok(config)
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Extraction settings derived from this configuration
    #[must_use]
    pub fn extraction_settings(&self) -> ExtractionSettings {
        ExtractionSettings {
            min_confidence: self.processing.min_confidence,
            body_orientation: self.processing.body_orientation,
            person_index: self.person_index,
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value or malformed bone definition
    pub fn validate(&self) -> Result<()> {
        self.processing.validate()?;

        if let Some(fps) = self.frame_rate.filter(|fps| !(fps.is_finite() && *fps > 0.0)) {
            return Err(Error::ConfigError(format!(
                "Frame rate must be greater than 0, got {fps}"
            )));
        }

        resolve_hierarchy(&self.bones)?;

        Ok(())
    }
}

impl ProcessingConfig {
    /// Validate processing parameters
    ///
    /// # Errors
    ///
    /// Returns a configuration error for the first out-of-range value
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::ConfigError(
                "Minimum confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(self.min_trembling_freq.is_finite() && self.min_trembling_freq >= 0.0) {
            return Err(Error::ConfigError(
                "Minimum trembling frequency must be greater than or equal to 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mlf_max_error_ratio) {
            return Err(Error::ConfigError(
                "MLF max error ratio must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !self.body_orientation.is_finite() {
            return Err(Error::ConfigError("Body orientation must be finite".to_string()));
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pose to Animation Configuration

# Pose detector
detector:
  openpose_path: "OpenPose"
  executable: "bin/OpenPoseDemo.exe"
  keypoint_scale: 3

# Angle extraction and smoothing
processing:
  min_confidence: 0.6
  min_trembling_freq: 7.0
  mlf_max_error_ratio: 0.1
  max_keys_per_sec: 0
  body_orientation: 90.0

# Person of each frame to animate
person_index: 0

# Frames per second of the source. Leave unset to use the rate stored in
# the video (30 for a poses folder).
# frame_rate: 30.0

# Bones: start/end keypoints (BODY_25), parent position, object path
bones:
  - { start: 8, end: 1, path: "bone_1/bone_2" }
  - { start: 1, end: 0, parent: 0, path: "bone_1/bone_2/bone_3" }
  - { start: 5, end: 6, parent: 0, path: "bone_1/bone_2/bone_4" }
  - { start: 6, end: 7, parent: 2, path: "bone_1/bone_2/bone_4/bone_5" }
  - { start: 2, end: 3, parent: 0, path: "bone_1/bone_2/bone_6" }
  - { start: 3, end: 4, parent: 4, path: "bone_1/bone_2/bone_6/bone_7" }
  - { start: 9, end: 10, parent: 0, path: "bone_1/bone_8" }
  - { start: 10, end: 11, parent: 6, path: "bone_1/bone_8/bone_9" }
  - { start: 12, end: 13, parent: 0, path: "bone_1/bone_10" }
  - { start: 13, end: 14, parent: 8, path: "bone_1/bone_10/bone_11" }
"#;
