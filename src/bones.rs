//! Bone definitions and parent-before-child ordering.
//!
//! A bone spans two detector joints and may be expressed relative to a
//! parent bone. Bones live in a flat list and refer to their parent by
//! position, so the list must place every parent before its children for
//! the per-frame extraction to find the parent angle already computed.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One bone of the animated rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneDefinition {
    /// Joint where the bone starts. A fractional index is the midpoint of
    /// the two joints that bracket it.
    pub start: f64,

    /// Joint where the bone ends
    pub end: f64,

    /// Position of the parent bone in the definition list
    #[serde(default)]
    pub parent: Option<usize>,

    /// Object path of the bone in the target hierarchy, e.g. `bone_1/bone_2`
    pub path: String,
}

impl BoneDefinition {
    /// Create a bone definition
    #[must_use]
    pub fn new(start: f64, end: f64, parent: Option<usize>, path: impl Into<String>) -> Self {
        Self {
            start,
            end,
            parent,
            path: path.into(),
        }
    }

    fn check(&self, index: usize, count: usize) -> Result<()> {
        for (name, joint) in [("start", self.start), ("end", self.end)] {
            if !joint.is_finite() || joint < 0.0 {
                return Err(Error::InvalidBone {
                    index,
                    reason: format!("{name} joint {joint} is not a valid keypoint index"),
                });
            }
        }
        if self.path.trim().is_empty() {
            return Err(Error::InvalidBone {
                index,
                reason: "hierarchy path is empty".to_string(),
            });
        }
        match self.parent {
            Some(parent) if parent == index => Err(Error::InvalidBone {
                index,
                reason: "bone is its own parent".to_string(),
            }),
            Some(parent) if parent >= count => Err(Error::InvalidBone {
                index,
                reason: format!("parent {parent} does not exist ({count} bones defined)"),
            }),
            _ => Ok(()),
        }
    }
}

/// Humanoid rig over the BODY_25 keypoint layout
#[must_use]
pub fn default_bones() -> Vec<BoneDefinition> {
    vec![
        BoneDefinition::new(8.0, 1.0, None, "bone_1/bone_2"),
        BoneDefinition::new(1.0, 0.0, Some(0), "bone_1/bone_2/bone_3"),
        BoneDefinition::new(5.0, 6.0, Some(0), "bone_1/bone_2/bone_4"),
        BoneDefinition::new(6.0, 7.0, Some(2), "bone_1/bone_2/bone_4/bone_5"),
        BoneDefinition::new(2.0, 3.0, Some(0), "bone_1/bone_2/bone_6"),
        BoneDefinition::new(3.0, 4.0, Some(4), "bone_1/bone_2/bone_6/bone_7"),
        BoneDefinition::new(9.0, 10.0, Some(0), "bone_1/bone_8"),
        BoneDefinition::new(10.0, 11.0, Some(6), "bone_1/bone_8/bone_9"),
        BoneDefinition::new(12.0, 13.0, Some(0), "bone_1/bone_10"),
        BoneDefinition::new(13.0, 14.0, Some(8), "bone_1/bone_10/bone_11"),
    ]
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

/// Order bone definitions so that every parent precedes its children.
///
/// Already ordered input is returned borrowed. Otherwise a reordered copy
/// is returned with parent positions remapped.
///
/// Bones are emitted in definition order, except that a bone whose ancestor
/// is defined after it pulls that not yet emitted ancestor chain forward
/// and follows it directly. Ancestors therefore jump ahead of the bones
/// defined between them: `[root, late_child(parent 3), arm, leg]` becomes
/// `[root, leg, late_child, arm]`. Curves are written to the `.anim` file in
/// this order.
///
/// # Errors
///
/// Returns [`Error::InvalidBone`] for an empty list, a self-parented bone,
/// a dangling parent index, a parent cycle, or a malformed joint or path.
pub fn resolve_hierarchy(bones: &[BoneDefinition]) -> Result<Cow<'_, [BoneDefinition]>> {
    if bones.is_empty() {
        return Err(Error::InvalidBone {
            index: 0,
            reason: "at least one bone must be defined".to_string(),
        });
    }
    for (index, bone) in bones.iter().enumerate() {
        bone.check(index, bones.len())?;
    }

    let sorted = bones
        .iter()
        .enumerate()
        .all(|(index, bone)| bone.parent.map_or(true, |parent| parent < index));
    if sorted {
        return Ok(Cow::Borrowed(bones));
    }

    let mut state = vec![Visit::Pending; bones.len()];
    let mut order = Vec::with_capacity(bones.len());
    for root in 0..bones.len() {
        if state[root] == Visit::Done {
            continue;
        }
        // Walk up to the first placed (or missing) ancestor, then emit top-down
        let mut chain = Vec::new();
        let mut current = Some(root);
        while let Some(index) = current {
            match state[index] {
                Visit::Done => break,
                Visit::InProgress => {
                    return Err(Error::InvalidBone {
                        index,
                        reason: "parent chain forms a cycle".to_string(),
                    })
                }
                Visit::Pending => {
                    state[index] = Visit::InProgress;
                    chain.push(index);
                    current = bones[index].parent;
                }
            }
        }
        for &index in chain.iter().rev() {
            state[index] = Visit::Done;
            order.push(index);
        }
    }

    let mut new_position = vec![0; bones.len()];
    for (position, &old) in order.iter().enumerate() {
        new_position[old] = position;
    }
    let reordered = order
        .iter()
        .map(|&old| {
            let mut bone = bones[old].clone();
            bone.parent = bone.parent.map(|parent| new_position[parent]);
            bone
        })
        .collect::<Vec<_>>();

    log::debug!("Reordered bone definitions: {order:?}");
    Ok(Cow::Owned(reordered))
}

/// Validated bone list in parent-before-child order
#[derive(Debug, Clone, PartialEq)]
pub struct BoneHierarchy {
    bones: Vec<BoneDefinition>,
}

impl BoneHierarchy {
    /// Validate and order a bone list
    ///
    /// # Errors
    ///
    /// See [`resolve_hierarchy`].
    pub fn new(bones: &[BoneDefinition]) -> Result<Self> {
        Ok(Self {
            bones: resolve_hierarchy(bones)?.into_owned(),
        })
    }

    /// Ordered bones
    #[must_use]
    pub fn bones(&self) -> &[BoneDefinition] {
        &self.bones
    }

    /// Number of bones
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Whether the hierarchy holds no bones (never true once constructed)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
