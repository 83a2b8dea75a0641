//! Constants used throughout the application

/// Default orientation of the body in the image, in degrees (90 = upright)
pub const DEFAULT_BODY_ORIENTATION: f64 = 90.0;

/// Default minimum keypoint confidence
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// Default minimum trembling frequency in Hz (0 disables trembling reduction)
pub const DEFAULT_MIN_TREMBLING_FREQ: f64 = 7.0;

/// Default Multi-Line Fitting error ratio (0 disables simplification)
pub const DEFAULT_MLF_MAX_ERROR_RATIO: f64 = 0.1;

/// Default maximum keys per second (0 disables resampling)
pub const DEFAULT_MAX_KEYS_PER_SEC: usize = 0;

/// Default frames per second assumption
pub const DEFAULT_FPS: f64 = 30.0;

/// Default person to animate
pub const DEFAULT_PERSON_INDEX: usize = 0;

/// Values per keypoint in a detector frame (x, y, confidence)
pub const KEYPOINT_STRIDE: usize = 3;

/// Full turn in degrees
pub const FULL_TURN_DEGREES: f64 = 360.0;

/// Length of a resampling window in seconds
pub const RESAMPLE_WINDOW_SECONDS: f64 = 1.0;

/// Detector executable, relative to the OpenPose folder
pub const OPENPOSE_RELATIVE_EXE_PATH: &str = "bin/OpenPoseDemo.exe";

/// Keypoint scale flag passed to the detector (3 = normalised to [0, 1])
pub const OPENPOSE_KEYPOINT_SCALE: u32 = 3;

/// Name of the folder holding cached detector output
pub const POSES_FOLDER_NAME: &str = "Poses";

/// Name of the folder holding written animations
pub const ANIMATIONS_FOLDER_NAME: &str = "Animations";

/// Extension of written animation files
pub const ANIM_FILE_EXTENSION: &str = "anim";

/// Sample rate recorded in written animation clips
pub const ANIM_SAMPLE_RATE: u32 = 60;
