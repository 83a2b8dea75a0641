//! Bone angle extraction across the frames of a clip.
//!
//! Each frame contributes at most one angle sample per bone. A child bone
//! is measured relative to its parent and is only sampled when the parent
//! was sampled in the same frame. Stored angles are unwrapped against the
//! previous sample of the bone so the series never jumps by a full turn.

use crate::{
    bones::BoneHierarchy,
    frames::{list_frame_files, FrameRecord},
    keypoints::KeypointDecoder,
    utils::{closest_equivalent_angle, normalize_degrees},
    Error, Result,
};
use log::{debug, info, trace};
use std::path::Path;

/// One rotation sample of a bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    /// Seconds since the first usable frame
    pub time: f64,
    /// Rotation in degrees, unwrapped against the previous sample
    pub angle: f64,
}

impl AngleSample {
    /// Create a sample
    #[must_use]
    pub const fn new(time: f64, angle: f64) -> Self {
        Self { time, angle }
    }
}

/// Angle series of every bone, indexed like the bone hierarchy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneSeries {
    series: Vec<Vec<AngleSample>>,
}

impl BoneSeries {
    /// Empty series for `bone_count` bones
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        Self {
            series: vec![Vec::new(); bone_count],
        }
    }

    /// Samples of one bone
    #[must_use]
    pub fn bone(&self, index: usize) -> &[AngleSample] {
        self.series.get(index).map_or(&[], Vec::as_slice)
    }

    /// Number of bones tracked
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no bones are tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total samples over all bones
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.series.iter().map(Vec::len).sum()
    }

    /// Consume into per-bone sample vectors
    #[must_use]
    pub fn into_inner(self) -> Vec<Vec<AngleSample>> {
        self.series
    }

    fn last_at(&self, index: usize, time: f64) -> Option<AngleSample> {
        self.series
            .get(index)?
            .last()
            .copied()
            .filter(|sample| sample.time == time)
    }
}

/// Settings of the angle extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionSettings {
    /// Minimum keypoint confidence, in [0, 1]
    pub min_confidence: f64,
    /// Orientation of the body in the image, in degrees
    pub body_orientation: f64,
    /// Person of each frame to animate
    pub person_index: usize,
}

/// Turns per-frame keypoints into per-bone angle samples
#[derive(Debug, Clone)]
pub struct AngleExtractor {
    hierarchy: BoneHierarchy,
    decoder: KeypointDecoder,
    body_orientation: f64,
    person_index: usize,
}

impl AngleExtractor {
    /// Create an extractor for an ordered bone hierarchy
    #[must_use]
    pub fn new(hierarchy: BoneHierarchy, settings: ExtractionSettings) -> Self {
        Self {
            hierarchy,
            decoder: KeypointDecoder::new(settings.min_confidence),
            body_orientation: normalize_degrees(settings.body_orientation),
            person_index: settings.person_index,
        }
    }

    /// Bones being extracted
    #[must_use]
    pub fn hierarchy(&self) -> &BoneHierarchy {
        &self.hierarchy
    }

    /// Empty series sized for this extractor's bones
    #[must_use]
    pub fn new_series(&self) -> BoneSeries {
        BoneSeries::new(self.hierarchy.len())
    }

    /// Append the samples of one frame. A missing person yields nothing.
    ///
    /// Returns whether any bone obtained a sample.
    pub fn extract_frame(&self, frame: &FrameRecord, time: f64, series: &mut BoneSeries) -> bool {
        match frame.person_keypoints(self.person_index) {
            Some(keypoints) => self.extract_keypoints(keypoints, time, series),
            None => {
                trace!("Person {} not present at t={time:.3}", self.person_index);
                false
            }
        }
    }

    /// Append the samples computed from one person's keypoints.
    ///
    /// Returns whether any bone obtained a sample.
    pub fn extract_keypoints(&self, keypoints: &[f64], time: f64, series: &mut BoneSeries) -> bool {
        let mut contains_data = false;

        for (index, bone) in self.hierarchy.bones().iter().enumerate() {
            let parent_angle = match bone.parent {
                Some(parent) => match series.last_at(parent, time) {
                    Some(sample) => sample.angle,
                    None => continue,
                },
                None => 0.0,
            };

            let (Some(start), Some(end)) = (
                self.decoder.decode(keypoints, bone.start),
                self.decoder.decode(keypoints, bone.end),
            ) else {
                continue;
            };

            let mut angle = normalize_degrees(start.angle_to(end) - self.body_orientation - parent_angle);
            let bone_series = &mut series.series[index];
            if let Some(previous) = bone_series.last() {
                angle = closest_equivalent_angle(angle, previous.angle);
            }
            bone_series.push(AngleSample::new(time, angle));
            contains_data = true;
        }

        contains_data
    }
}

/// Angle series of a whole clip
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPoses {
    /// Per-bone samples
    pub series: BoneSeries,
    /// Timestamp of the last frame that produced a sample
    pub duration: f64,
    /// Frames read, including those without data
    pub frame_count: usize,
}

/// Assigns frame timestamps and feeds frames through an extractor
#[derive(Debug, Clone)]
pub struct PoseReader {
    extractor: AngleExtractor,
    frame_rate: f64,
}

impl PoseReader {
    /// Create a reader for frames spaced `1 / frame_rate` seconds apart
    ///
    /// # Errors
    ///
    /// Returns an error if the frame rate is not a positive number
    pub fn new(extractor: AngleExtractor, frame_rate: f64) -> Result<Self> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Frame rate must be positive, got {frame_rate}"
            )));
        }
        Ok(Self { extractor, frame_rate })
    }

    /// The extractor in use
    #[must_use]
    pub fn extractor(&self) -> &AngleExtractor {
        &self.extractor
    }

    /// Extract frames given in capture order.
    ///
    /// Time zero is the first frame that yields a sample; frames before it
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Propagates the first error produced by the frame source
    pub fn read_frames<I>(&self, frames: I) -> Result<ExtractedPoses>
    where
        I: IntoIterator<Item = Result<FrameRecord>>,
    {
        let mut series = self.extractor.new_series();
        let mut first_frame: Option<usize> = None;
        let mut duration = 0.0;
        let mut frame_count = 0;

        for (number, frame) in frames.into_iter().enumerate() {
            let frame = frame?;
            frame_count += 1;
            #[allow(clippy::cast_precision_loss)] // Frame counts are far below 2^52
            let time = (number - first_frame.unwrap_or(number)) as f64 / self.frame_rate;

            if self.extractor.extract_frame(&frame, time, &mut series) {
                if first_frame.is_none() {
                    debug!("First frame with data: {number}");
                    first_frame = Some(number);
                }
                duration = time;
            }
        }

        info!(
            "Read {frame_count} frames, {} samples, duration {duration:.2}s",
            series.sample_count()
        );
        Ok(ExtractedPoses {
            series,
            duration,
            frame_count,
        })
    }

    /// Extract every frame file of a detector output directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any frame file cannot be read
    pub fn read_dir<P: AsRef<Path>>(&self, dir: P) -> Result<ExtractedPoses> {
        let files = list_frame_files(dir)?;
        self.read_frames(files.iter().map(FrameRecord::from_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bones::BoneDefinition;
    use crate::frames::PersonRecord;
    use approx::assert_relative_eq;

    /// Keypoints placing joint 0 at the centre and joint `1 + i` at `angles[i]`
    fn keypoints(angles: &[Option<f64>]) -> Vec<f64> {
        let mut values = vec![0.5, 0.5, 1.0];
        for angle in angles {
            match angle {
                Some(degrees) => {
                    let radians = degrees.to_radians();
                    // y grows downwards in detector space
                    values.extend([0.5 + 0.1 * radians.cos(), 0.5 - 0.1 * radians.sin(), 1.0]);
                }
                None => values.extend([0.0, 0.0, 0.0]),
            }
        }
        values
    }

    fn extractor(bones: &[BoneDefinition], orientation: f64) -> AngleExtractor {
        AngleExtractor::new(
            BoneHierarchy::new(bones).unwrap(),
            ExtractionSettings {
                min_confidence: 0.5,
                body_orientation: orientation,
                person_index: 0,
            },
        )
    }

    #[test]
    fn test_unwraps_against_previous_sample() {
        let extractor = extractor(&[BoneDefinition::new(0.0, 1.0, None, "a")], 0.0);
        let mut series = extractor.new_series();

        for (frame, angle) in [0.0, 5.0, 358.0, 6.0].iter().enumerate() {
            assert!(extractor.extract_keypoints(&keypoints(&[Some(*angle)]), frame as f64, &mut series));
        }

        let angles: Vec<f64> = series.bone(0).iter().map(|s| s.angle).collect();
        for (got, want) in angles.iter().zip([0.0, 5.0, -2.0, 6.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_body_orientation_offset() {
        let extractor = extractor(&[BoneDefinition::new(0.0, 1.0, None, "a")], 90.0);
        let mut series = extractor.new_series();
        extractor.extract_keypoints(&keypoints(&[Some(100.0)]), 0.0, &mut series);
        assert_relative_eq!(series.bone(0)[0].angle, 10.0, epsilon = 1e-9);

        let mut series = extractor.new_series();
        extractor.extract_keypoints(&keypoints(&[Some(45.0)]), 0.0, &mut series);
        assert_relative_eq!(series.bone(0)[0].angle, 315.0, epsilon = 1e-9);
    }

    #[test]
    fn test_child_is_relative_to_parent() {
        let bones = [
            BoneDefinition::new(0.0, 1.0, None, "parent"),
            BoneDefinition::new(0.0, 2.0, Some(0), "parent/child"),
        ];
        let extractor = extractor(&bones, 0.0);
        let mut series = extractor.new_series();

        extractor.extract_keypoints(&keypoints(&[Some(30.0), Some(50.0)]), 0.0, &mut series);
        assert_relative_eq!(series.bone(1)[0].angle, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_child_skipped_without_parent_sample() {
        let bones = [
            BoneDefinition::new(0.0, 1.0, None, "parent"),
            BoneDefinition::new(0.0, 2.0, Some(0), "parent/child"),
        ];
        let extractor = extractor(&bones, 0.0);
        let mut series = extractor.new_series();

        extractor.extract_keypoints(&keypoints(&[Some(30.0), Some(50.0)]), 0.0, &mut series);
        // Parent missing this frame: the child must not reuse the old parent angle
        let contains_data = extractor.extract_keypoints(&keypoints(&[None, Some(60.0)]), 1.0, &mut series);

        assert!(!contains_data);
        assert_eq!(series.bone(0).len(), 1);
        assert_eq!(series.bone(1).len(), 1);
    }

    #[test]
    fn test_missing_person_contributes_nothing() {
        let extractor = extractor(&[BoneDefinition::new(0.0, 1.0, None, "a")], 0.0);
        let mut series = extractor.new_series();
        let frame = FrameRecord::default();
        assert!(!extractor.extract_frame(&frame, 0.0, &mut series));
        assert_eq!(series.sample_count(), 0);
    }

    #[test]
    fn test_reader_times_from_first_usable_frame() {
        let extractor = extractor(&[BoneDefinition::new(0.0, 1.0, None, "a")], 0.0);
        let reader = PoseReader::new(extractor, 10.0).unwrap();

        let person = |angle| PersonRecord {
            pose_keypoints_2d: keypoints(&[angle]),
        };
        let frames = vec![
            FrameRecord::default(),
            FrameRecord { people: vec![person(None)] },
            FrameRecord { people: vec![person(Some(10.0))] },
            FrameRecord { people: vec![person(Some(20.0))] },
            FrameRecord { people: vec![person(None)] },
            FrameRecord { people: vec![person(Some(30.0))] },
            FrameRecord::default(),
        ];

        let poses = reader.read_frames(frames.into_iter().map(Ok)).unwrap();
        let times: Vec<f64> = poses.series.bone(0).iter().map(|s| s.time).collect();
        assert_eq!(poses.frame_count, 7);
        assert_relative_eq!(times[0], 0.0);
        assert_relative_eq!(times[1], 0.1);
        assert_relative_eq!(times[2], 0.3);
        assert_relative_eq!(poses.duration, 0.3);
    }

    #[test]
    fn test_reader_rejects_bad_frame_rate() {
        let extractor = extractor(&[BoneDefinition::new(0.0, 1.0, None, "a")], 0.0);
        assert!(PoseReader::new(extractor.clone(), 0.0).is_err());
        assert!(PoseReader::new(extractor, f64::NAN).is_err());
    }
}
