//! Per-frame keypoint files written by the pose detector.
//!
//! The detector writes one JSON file per video frame:
//!
//! ```json
//! {"version": 1.3, "people": [{"pose_keypoints_2d": [x0, y0, c0, x1, y1, c1, ...]}]}
//! ```
//!
//! File names carry the frame number, but not always zero padded, so the
//! directory listing is ordered by that number rather than lexically.

use crate::{Error, Result};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of detector frame files
pub const FRAME_FILE_EXTENSION: &str = "json";

/// Detections of one frame
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameRecord {
    /// Detected people, in detector order
    #[serde(default)]
    pub people: Vec<PersonRecord>,
}

/// Detections of one person
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonRecord {
    /// Interleaved `(x, y, confidence)` triples in BODY_25 order
    #[serde(default)]
    pub pose_keypoints_2d: Vec<f64>,
}

impl FrameRecord {
    /// Parse a frame from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid frame record
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a frame file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|source| Error::FrameDecode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Keypoints of the selected person, if that person was detected
    #[must_use]
    pub fn person_keypoints(&self, person_index: usize) -> Option<&[f64]> {
        self.people
            .get(person_index)
            .map(|person| person.pose_keypoints_2d.as_slice())
    }
}

/// Frame number encoded in a file name: the last run of digits in its stem
#[must_use]
pub fn frame_number(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    stem.trim_end_matches(|c: char| !c.is_ascii_digit())
        .rsplit(|c: char| !c.is_ascii_digit())
        .next()?
        .parse()
        .ok()
}

fn compare_frames(a: &Path, b: &Path) -> Ordering {
    match (frame_number(a), frame_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// List the frame files of a directory in capture order
///
/// # Errors
///
/// Returns an error if the directory cannot be read
pub fn list_frame_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let is_frame = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(FRAME_FILE_EXTENSION));
        if is_frame {
            files.push(path);
        }
    }
    files.sort_by(|a, b| compare_frames(a, b));
    log::debug!("Found {} frame files in {}", files.len(), dir.as_ref().display());
    Ok(files)
}
