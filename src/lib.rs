//! Pose to animation library: turns per-frame 2D body keypoints into
//! compact, smooth bone rotation curves.
//!
//! The conversion pipeline consists of:
//! 1. Ordering the bone definitions so parents precede children
//! 2. Reading the detector's per-frame keypoint files in frame order
//! 3. Extracting one continuity-preserving angle per bone and frame
//! 4. Optional smoothing: trembling removal, Multi-Line Fitting and
//!    keyframe density capping
//! 5. Computing keyframe tangents and writing a Unity `.anim` file
//!
//! # Examples
//!
//! ## Converting detected poses
//!
//! ```no_run
//! use pose2anim::app::{AppConfig, Pose2AnimApp, PoseSource};
//! use pose2anim::config::Config;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = Pose2AnimApp::new(AppConfig {
//!     source: PoseSource::Poses(PathBuf::from("Poses/dance")),
//!     output_folder: PathBuf::from("Animations"),
//!     config: Config::default(),
//! })?;
//! let clip = app.run()?;
//! println!("{} curves over {:.2}s", clip.curves.len(), clip.duration);
//! # Ok(())
//! # }
//! ```
//!
//! ## Smoothing a single series
//!
//! ```
//! use pose2anim::extraction::AngleSample;
//! use pose2anim::filters::{create_filter, SeriesFilter};
//! use pose2anim::tangents::to_keyframes;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samples: Vec<AngleSample> = (0..10)
//!     .map(|i| AngleSample::new(f64::from(i) / 30.0, f64::from(i) * 2.0))
//!     .collect();
//!
//! let mlf = create_filter("mlf:0.1")?;
//! let simplified = mlf.apply(&samples);
//! assert_eq!(simplified.len(), 2);
//!
//! let keys = to_keyframes(&simplified);
//! assert_eq!(keys[0].tangent, 0.0);
//! # Ok(())
//! # }
//! ```

/// Bone definitions and hierarchy ordering
pub mod bones;

/// Confidence-gated keypoint decoding
pub mod keypoints;

/// Detector frame files
pub mod frames;

/// Per-bone angle extraction over the frames of a clip
pub mod extraction;

/// Series smoothing stages
pub mod filters;

/// Keyframe tangent computation
pub mod tangents;

/// Per-bone processing into animation curves
pub mod pipeline;

/// External pose detector invocation
pub mod detector;

/// Source video frame rate
pub mod video;

/// Unity `.anim` serialization
pub mod anim_writer;

/// Main application module
pub mod app;

/// Command-line interface
pub mod cli;

/// Angle helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
