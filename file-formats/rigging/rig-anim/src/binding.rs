//! Explicit mapping from animation channels to skeleton DOFs.
//!
//! Channels 0..3 drive the root translation. Every following triple drives
//! the X, Y and Z rotation of one joint, taking joints in the skeleton's
//! traversal order. The table is built once per (animation, skeleton) pair so
//! the pairing can be inspected and checked instead of being implied.

use crate::animation::Animation;
use crate::error::{AnimError, Result};
use glam::Vec3;
use rig_skel::{JointId, Skeleton};

/// Channels of the root translation
pub const ROOT_CHANNELS: [usize; 3] = [0, 1, 2];

/// Number of channels a skeleton with `joint_count` joints consumes
pub fn expected_channels(joint_count: usize) -> usize {
    3 + 3 * joint_count
}

/// Rotation channels assigned to one joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointChannels {
    /// Position of the joint in the traversal list
    pub list_index: usize,
    /// Joint receiving the pose
    pub joint: JointId,
    /// Channel indices for rotation X, Y and Z
    pub channels: [usize; 3],
}

/// Channel-to-DOF assignment for one animation and one skeleton
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelMap {
    root: Option<JointId>,
    joints: Vec<JointChannels>,
    channel_count: usize,
    joint_count: usize,
}

impl ChannelMap {
    /// Pair channels with joints positionally, without any checks
    pub fn positional(channel_count: usize, skeleton: &Skeleton) -> Self {
        if channel_count < 3 {
            return Self {
                root: None,
                joints: Vec::new(),
                channel_count,
                joint_count: skeleton.joint_count(),
            };
        }

        let joints = skeleton
            .joint_list()
            .iter()
            .enumerate()
            .map_while(|(list_index, &joint)| {
                let first = 3 + 3 * list_index;
                (first + 3 <= channel_count).then_some(JointChannels {
                    list_index,
                    joint,
                    channels: [first, first + 1, first + 2],
                })
            })
            .collect();

        Self {
            root: Some(skeleton.root()),
            joints,
            channel_count,
            joint_count: skeleton.joint_count(),
        }
    }

    /// Build the map, warning when channel and joint counts disagree
    pub fn bind(animation: &Animation, skeleton: &Skeleton) -> Self {
        let map = Self::positional(animation.channel_count(), skeleton);
        if !map.is_exact() {
            log::warn!(
                "Animation has {} channels, skeleton with {} joints expects {} ({} joints unanimated, {} channels unused)",
                map.channel_count,
                map.joint_count,
                map.expected_channels(),
                map.unanimated_joints().len(),
                map.unused_channels().len()
            );
        }
        map
    }

    /// Build the map, failing unless every joint is animated and every
    /// channel is used
    pub fn bind_strict(animation: &Animation, skeleton: &Skeleton) -> Result<Self> {
        let map = Self::positional(animation.channel_count(), skeleton);
        if map.is_exact() {
            Ok(map)
        } else {
            Err(AnimError::ChannelMismatch {
                expected: map.expected_channels(),
                found: map.channel_count,
            })
        }
    }

    /// Channel count required for a one-to-one mapping
    pub fn expected_channels(&self) -> usize {
        expected_channels(self.joint_count)
    }

    /// Whether channel count and joint count match exactly
    pub fn is_exact(&self) -> bool {
        self.channel_count == self.expected_channels()
    }

    /// Root joint driven by channels 0..3, if the animation has them
    pub fn root(&self) -> Option<JointId> {
        self.root
    }

    /// Per-joint channel assignments in traversal order
    pub fn joints(&self) -> &[JointChannels] {
        &self.joints
    }

    /// Assignment for a joint, if it is animated
    pub fn joint_channels(&self, joint: JointId) -> Option<&JointChannels> {
        self.joints.iter().find(|entry| entry.joint == joint)
    }

    /// Traversal-list indices of joints left without channels
    pub fn unanimated_joints(&self) -> std::ops::Range<usize> {
        self.joints.len()..self.joint_count
    }

    /// Channel indices not consumed by the root or any joint
    pub fn unused_channels(&self) -> std::ops::Range<usize> {
        let used = match self.root {
            Some(_) => 3 + 3 * self.joints.len(),
            None => 0,
        };
        used.min(self.channel_count)..self.channel_count
    }

    /// Evaluate the animation at `time` and write the root offset and joint
    /// poses into `skeleton`.
    ///
    /// Joints are addressed by id, so the skeleton must be the one the map
    /// was built for.
    pub fn apply(&self, animation: &Animation, time: f32, skeleton: &mut Skeleton) {
        let Some(root) = self.root else {
            return;
        };

        let sample = |[x, y, z]: [usize; 3]| {
            Vec3::new(
                animation.evaluate_channel(x, time),
                animation.evaluate_channel(y, time),
                animation.evaluate_channel(z, time),
            )
        };

        if let Some(joint) = skeleton.joint_mut(root) {
            joint.set_offset(sample(ROOT_CHANNELS));
        }
        for entry in &self.joints {
            if let Some(joint) = skeleton.joint_mut(entry.joint) {
                joint.set_pose(sample(entry.channels));
            }
        }
    }
}
