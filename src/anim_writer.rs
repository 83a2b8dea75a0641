//! Serialization of animation clips to Unity's `.anim` YAML format.
//!
//! Every bone becomes a Z-axis Euler rotation curve plus the matching
//! editor curve on `localEulerAnglesRaw.z`. Keys carry a single slope used
//! for both the in and out tangent.

use crate::{
    constants::ANIM_SAMPLE_RATE,
    pipeline::{AnimationClip, BoneCurve},
    tangents::Keyframe,
    Result,
};
use std::fs;
use std::path::Path;

const EDITOR_ATTRIBUTE: &str = "localEulerAnglesRaw.z";

fn write_euler_key(out: &mut String, key: &Keyframe) {
    out.push_str(&format!(
        "      - serializedVersion: 3
        time: {time:.4}
        value: {{x: 0, y: 0, z: {value}}}
        inSlope: {{x: 0, y: 0, z: {slope}}}
        outSlope: {{x: 0, y: 0, z: {slope}}}
        tangentMode: 0
        weightedMode: 0
        inWeight: {{x: 0, y: 0, z: 0.5}}
        outWeight: {{x: 0, y: 0, z: 0.5}}
",
        time = key.time,
        value = key.angle,
        slope = key.tangent,
    ));
}

fn write_editor_key(out: &mut String, key: &Keyframe) {
    out.push_str(&format!(
        "      - serializedVersion: 3
        time: {time:.4}
        value: {value}
        inSlope: {slope}
        outSlope: {slope}
        tangentMode: 0
        weightedMode: 0
        inWeight: 0.5
        outWeight: 0.5
",
        time = key.time,
        value = key.angle,
        slope = key.tangent,
    ));
}

fn write_euler_curve(out: &mut String, curve: &BoneCurve) {
    out.push_str("  - curve:\n      serializedVersion: 2\n      m_Curve:\n");
    for key in &curve.keyframes {
        write_euler_key(out, key);
    }
    out.push_str(&format!(
        "      m_PreInfinity: 2
      m_PostInfinity: 2
      m_RotationOrder: 4
    path: {path}
",
        path = curve.path,
    ));
}

fn write_editor_curve(out: &mut String, curve: &BoneCurve) {
    out.push_str("  - curve:\n      serializedVersion: 2\n      m_Curve:\n");
    for key in &curve.keyframes {
        write_editor_key(out, key);
    }
    out.push_str(&format!(
        "      m_PreInfinity: 2
      m_PostInfinity: 2
      m_RotationOrder: 4
    attribute: {EDITOR_ATTRIBUTE}
    path: {path}
    classID: 4
    script: {{fileID: 0}}
",
        path = curve.path,
    ));
}

/// Render a clip as the text of a `.anim` file named `name`
#[must_use]
pub fn render_anim(clip: &AnimationClip, name: &str) -> String {
    let mut euler_curves = String::new();
    let mut editor_curves = String::new();
    for curve in &clip.curves {
        write_euler_curve(&mut euler_curves, curve);
        write_editor_curve(&mut editor_curves, curve);
    }

    format!(
        "%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!74 &7400000
AnimationClip:
  m_ObjectHideFlags: 0
  m_CorrespondingSourceObject: {{fileID: 0}}
  m_PrefabInstance: {{fileID: 0}}
  m_PrefabAsset: {{fileID: 0}}
  m_Name: {name}
  serializedVersion: 6
  m_Legacy: 0
  m_Compressed: 0
  m_UseHighQualityCurve: 1
  m_RotationCurves: []
  m_CompressedRotationCurves: []
  m_EulerCurves:
{euler_curves}  m_PositionCurves: []
  m_ScaleCurves: []
  m_FloatCurves: []
  m_PPtrCurves: []
  m_SampleRate: {ANIM_SAMPLE_RATE}
  m_WrapMode: 0
  m_Bounds:
    m_Center: {{x: 0, y: 0, z: 0}}
    m_Extent: {{x: 0, y: 0, z: 0}}
  m_ClipBindingConstant:
    genericBindings:
    - serializedVersion: 2
      path: 134607859
      attribute: 4
      script: {{fileID: 0}}
      typeID: 4
      customType: 4
      isPPtrCurve: 0
    pptrCurveMapping: []
  m_AnimationClipSettings:
    serializedVersion: 2
    m_AdditiveReferencePoseClip: {{fileID: 0}}
    m_AdditiveReferencePoseTime: 0
    m_StartTime: 0
    m_StopTime: {duration}
    m_OrientationOffsetY: 0
    m_Level: 0
    m_CycleOffset: 0
    m_HasAdditiveReferencePose: 0
    m_LoopTime: 1
    m_LoopBlend: 0
    m_LoopBlendOrientation: 0
    m_LoopBlendPositionY: 0
    m_LoopBlendPositionXZ: 0
    m_KeepOriginalOrientation: 0
    m_KeepOriginalPositionY: 1
    m_KeepOriginalPositionXZ: 0
    m_HeightFromFeet: 0
    m_Mirror: 0
  m_EditorCurves:
{editor_curves}  m_EulerEditorCurves: []
  m_HasGenericRootTransform: 0
  m_HasMotionFloatCurves: 0
  m_Events: []
",
        duration = clip.duration,
    )
}

/// Write a clip to `path`, creating parent folders. The clip is named
/// after the file stem.
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn write_anim<P: AsRef<Path>>(clip: &AnimationClip, path: P) -> Result<()> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_anim(clip, &name))?;
    log::info!("Animation written to {}", path.display());
    Ok(())
}
