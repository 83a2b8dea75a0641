//! Per-bone processing from raw angle series to keyframe curves.

use crate::{
    bones::BoneHierarchy,
    config::ProcessingConfig,
    extraction::{AngleSample, ExtractedPoses},
    filters::{multi_line_fitting::MultiLineFitting, resample::Resampler, trembling::TremblingFilter, SeriesFilter},
    tangents::{to_keyframes, Keyframe},
    Result,
};
use log::debug;

/// Keyframes of one bone
#[derive(Debug, Clone, PartialEq)]
pub struct BoneCurve {
    /// Object path of the bone in the target hierarchy
    pub path: String,
    /// Keyframes in ascending time
    pub keyframes: Vec<Keyframe>,
}

/// Finished animation, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Curves of the bones that were observed at least once, in hierarchy order
    pub curves: Vec<BoneCurve>,
    /// Timestamp of the last frame that produced a sample
    pub duration: f64,
}

impl AnimationClip {
    /// Total keyframes over all curves
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.curves.iter().map(|curve| curve.keyframes.len()).sum()
    }
}

/// Ordered chain of smoothing stages applied to every bone
pub struct Pipeline {
    stages: Vec<Box<dyn SeriesFilter>>,
}

impl Pipeline {
    /// Pipeline running the given stages in order
    #[must_use]
    pub fn new(stages: Vec<Box<dyn SeriesFilter>>) -> Self {
        Self { stages }
    }

    /// Build the trembling, Multi-Line Fitting and resampling stages that
    /// the configuration enables, in that order
    ///
    /// # Errors
    ///
    /// Returns an error if the processing parameters are out of range
    pub fn from_config(config: &ProcessingConfig) -> Result<Self> {
        config.validate()?;

        let mut stages: Vec<Box<dyn SeriesFilter>> = Vec::new();
        if let Some(filter) = TremblingFilter::from_frequency(config.min_trembling_freq) {
            stages.push(Box::new(filter));
        }
        if config.mlf_max_error_ratio > 0.0 {
            stages.push(Box::new(MultiLineFitting::new(config.mlf_max_error_ratio)));
        }
        if config.max_keys_per_sec > 0 {
            stages.push(Box::new(Resampler::new(config.max_keys_per_sec)));
        }
        Ok(Self::new(stages))
    }

    /// Names of the active stages
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage over one series and attach tangents
    #[must_use]
    pub fn process_series(&self, samples: &[AngleSample]) -> Vec<Keyframe> {
        let mut current = samples.to_vec();
        for stage in &self.stages {
            let before = current.len();
            current = stage.apply(&current);
            debug!("{}: {before} -> {} keys", stage.name(), current.len());
        }
        to_keyframes(&current)
    }

    /// Turn extracted series into curves. Bones never observed are left out.
    #[must_use]
    pub fn process(&self, bones: &BoneHierarchy, poses: ExtractedPoses) -> AnimationClip {
        let curves = bones
            .bones()
            .iter()
            .zip(poses.series.into_inner())
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(bone, samples)| {
                debug!("Processing bone {} ({} samples)", bone.path, samples.len());
                BoneCurve {
                    path: bone.path.clone(),
                    keyframes: self.process_series(&samples),
                }
            })
            .collect();

        AnimationClip {
            curves,
            duration: poses.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bones::BoneDefinition;
    use crate::extraction::BoneSeries;

    fn disabled() -> ProcessingConfig {
        ProcessingConfig {
            min_trembling_freq: 0.0,
            mlf_max_error_ratio: 0.0,
            max_keys_per_sec: 0,
            ..ProcessingConfig::default()
        }
    }

    #[test]
    fn test_stage_selection() {
        assert!(Pipeline::from_config(&disabled()).unwrap().stage_names().is_empty());

        let all = ProcessingConfig {
            max_keys_per_sec: 5,
            ..ProcessingConfig::default()
        };
        assert_eq!(
            Pipeline::from_config(&all).unwrap().stage_names(),
            vec!["TremblingFilter", "MultiLineFitting", "Resampler"]
        );

        let invalid = ProcessingConfig {
            min_confidence: -0.1,
            ..ProcessingConfig::default()
        };
        assert!(Pipeline::from_config(&invalid).is_err());
    }

    #[test]
    fn test_unobserved_bones_are_omitted() {
        let bones = BoneHierarchy::new(&[
            BoneDefinition::new(0.0, 1.0, None, "seen"),
            BoneDefinition::new(1.0, 2.0, None, "unseen"),
        ])
        .unwrap();
        let extractor = crate::extraction::AngleExtractor::new(
            bones.clone(),
            crate::extraction::ExtractionSettings {
                min_confidence: 0.5,
                body_orientation: 0.0,
                person_index: 0,
            },
        );
        let mut series = BoneSeries::new(2);
        let keypoints = [0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        extractor.extract_keypoints(&keypoints, 0.0, &mut series);

        let clip = Pipeline::from_config(&disabled()).unwrap().process(
            &bones,
            ExtractedPoses {
                series,
                duration: 0.0,
                frame_count: 1,
            },
        );
        assert_eq!(clip.curves.len(), 1);
        assert_eq!(clip.curves[0].path, "seen");
        assert_eq!(clip.keyframe_count(), 1);
        assert_eq!(clip.curves[0].keyframes[0].tangent, 0.0);
    }
}
