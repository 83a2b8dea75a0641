//! Frame rate of source videos.
//!
//! Frame timestamps come from the rate stored in the video container, read
//! with `OpenCV` when the crate is built with the `opencv` feature. A
//! configured rate always takes precedence and skips opening the video.

use crate::{constants::DEFAULT_FPS, Result};
use log::{info, warn};
use std::path::Path;

/// Read the frame rate stored in a video.
///
/// Returns `None` when the container does not report a usable rate.
///
/// # Errors
///
/// Returns an error if the file cannot be opened as a video
#[cfg(feature = "opencv")]
pub fn probe_frame_rate(video: &Path) -> Result<Option<f64>> {
    use crate::Error;
    use opencv::{prelude::*, videoio};

    let mut capture = videoio::VideoCapture::from_file(&video.to_string_lossy(), videoio::CAP_ANY)?;
    if !capture.is_opened()? {
        return Err(Error::InvalidInput(format!(
            "{} does not contain a video",
            video.display()
        )));
    }
    let fps = capture.get(videoio::CAP_PROP_FPS)?;
    capture.release()?;

    Ok((fps.is_finite() && fps > 0.0).then_some(fps))
}

/// Read the frame rate stored in a video. Without the `opencv` feature the
/// rate is never known.
///
/// # Errors
///
/// Never fails in this configuration
#[cfg(not(feature = "opencv"))]
pub fn probe_frame_rate(video: &Path) -> Result<Option<f64>> {
    log::debug!(
        "Built without the opencv feature, cannot read the frame rate of {}",
        video.display()
    );
    Ok(None)
}

/// Pick the frame rate for timestamps: the configured one, else the one
/// read from the video, else [`DEFAULT_FPS`]
#[must_use]
pub fn resolve_frame_rate(configured: Option<f64>, probed: Option<f64>) -> f64 {
    match (configured, probed) {
        (Some(fps), _) => {
            info!("Using configured frame rate {fps}");
            fps
        }
        (None, Some(fps)) => {
            info!("Using video frame rate {fps}");
            fps
        }
        (None, None) => {
            warn!("Frame rate unknown, assuming {DEFAULT_FPS} fps");
            DEFAULT_FPS
        }
    }
}
