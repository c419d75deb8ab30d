//! Joint arena and hierarchy traversal
//!
//! Joints live in a flat arena addressed by [`JointId`]. Each joint stores its
//! parent and its children (in insertion order), and the skeleton derives a
//! pre-order traversal list from that tree whenever it is built. The traversal
//! list is the "joint list" other components index into: animation channel
//! triples and skin bind matrices both refer to joints by their position in it.

use crate::error::{Result, SkelError};
use crate::joint::{Dof, Joint, JointId, RotationLimit};
use glam::{Mat4, Vec3};
use std::path::Path;

/// Incrementally assembles a [`Skeleton`] from a root joint
#[derive(Debug, Clone)]
pub struct SkeletonBuilder {
    joints: Vec<Joint>,
}

impl SkeletonBuilder {
    /// Start a skeleton with `root` at [`JointId::ROOT`]
    pub fn new(root: Joint) -> Self {
        let mut root = root;
        root.parent = None;
        root.children.clear();
        Self { joints: vec![root] }
    }

    /// Attach `joint` as the last child of `parent`
    pub fn add_child(&mut self, parent: JointId, joint: Joint) -> Result<JointId> {
        if parent.0 >= self.joints.len() {
            return Err(SkelError::InvalidJoint(parent.0));
        }

        let id = JointId(self.joints.len());
        let mut joint = joint;
        joint.parent = Some(parent);
        joint.children.clear();
        self.joints.push(joint);
        self.joints[parent.0].children.push(id);
        Ok(id)
    }

    /// Joint added earlier, for filling in its fields
    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id.0)
    }

    /// Number of joints added so far
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Always false; a builder holds at least its root
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Finish the skeleton and derive its traversal list
    pub fn build(self) -> Skeleton {
        let order = traversal_order(&self.joints, JointId::ROOT);
        Skeleton {
            joints: self.joints,
            order,
        }
    }
}

/// Pre-order walk from `root`, visiting children in insertion order
fn traversal_order(joints: &[Joint], root: JointId) -> Vec<JointId> {
    let mut order = Vec::with_capacity(joints.len());
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        order.push(id);
        stack.extend(joints[id.0].children.iter().rev().copied());
    }

    order
}

/// A hierarchy of ball joints with a single root
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Skeleton {
    joints: Vec<Joint>,
    order: Vec<JointId>,
}

impl Skeleton {
    /// Load a skeleton from a `.skel` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let skeleton = Self::parse(&text)?;
        log::info!(
            "Loaded skeleton {} ({} joints)",
            path.display(),
            skeleton.joint_count()
        );
        Ok(skeleton)
    }

    /// Parse a skeleton from `.skel` text
    pub fn parse(text: &str) -> Result<Self> {
        crate::parser::parse_skeleton(text)
    }

    /// Number of joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Id of the root joint
    pub fn root(&self) -> JointId {
        JointId::ROOT
    }

    /// The traversal list: joint ids in pre-order
    pub fn joint_list(&self) -> &[JointId] {
        &self.order
    }

    /// Joints in traversal order
    pub fn joints(&self) -> impl Iterator<Item = &Joint> + '_ {
        self.order.iter().map(|id| &self.joints[id.0])
    }

    /// Joint by id
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id.0)
    }

    /// Mutable joint by id; only pose and offset are editable
    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id.0)
    }

    /// Id of the joint at `index` in the traversal list
    pub fn id_at(&self, index: usize) -> Option<JointId> {
        self.order.get(index).copied()
    }

    /// Joint at `index` in the traversal list
    pub fn joint_at(&self, index: usize) -> Option<&Joint> {
        self.id_at(index).and_then(|id| self.joint(id))
    }

    /// Position of `id` in the traversal list
    pub fn list_index(&self, id: JointId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// First joint (in traversal order) with the given name
    pub fn find_joint(&self, name: &str) -> Option<JointId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.joints[id.0].name() == name)
    }

    /// Parent of a joint
    pub fn parent(&self, id: JointId) -> Option<JointId> {
        self.joint(id).and_then(Joint::parent)
    }

    /// Children of a joint in insertion order
    pub fn children(&self, id: JointId) -> &[JointId] {
        self.joint(id).map(Joint::children).unwrap_or_default()
    }

    /// Depth of a joint below the root (root is 0)
    pub fn depth(&self, id: JointId) -> usize {
        std::iter::successors(self.parent(id), |&p| self.parent(p)).count()
    }

    /// World transform from the last update
    pub fn world_matrix(&self, id: JointId) -> Option<Mat4> {
        self.joint(id).map(Joint::world_matrix)
    }

    /// World matrices in traversal order
    pub fn world_matrices(&self) -> Vec<Mat4> {
        self.joints().map(Joint::world_matrix).collect()
    }

    /// World-space origin of a joint from the last update
    pub fn world_position(&self, id: JointId) -> Option<Vec3> {
        self.joint(id).map(Joint::world_position)
    }

    /// Current pose of a joint
    pub fn pose(&self, id: JointId) -> Option<Vec3> {
        self.joint(id).map(Joint::pose)
    }

    /// Replace the pose of a joint
    pub fn set_pose(&mut self, id: JointId, pose: Vec3) -> Result<()> {
        self.joint_mut(id)
            .ok_or(SkelError::InvalidJoint(id.0))?
            .set_pose(pose);
        Ok(())
    }

    /// Replace the offset of a joint
    pub fn set_offset(&mut self, id: JointId, offset: Vec3) -> Result<()> {
        self.joint_mut(id)
            .ok_or(SkelError::InvalidJoint(id.0))?
            .set_offset(offset);
        Ok(())
    }

    /// Set one DOF of a joint's pose
    pub fn set_dof(&mut self, id: JointId, dof: Dof, value: f32) -> Result<()> {
        self.joint_mut(id)
            .ok_or(SkelError::InvalidJoint(id.0))?
            .set_dof(dof, value);
        Ok(())
    }

    /// Add `delta` to one DOF of the stored pose and return the new raw value.
    ///
    /// Limits are not applied here; they only affect the transform built by
    /// [`Skeleton::update`].
    pub fn nudge_dof(&mut self, id: JointId, dof: Dof, delta: f32) -> Result<f32> {
        let joint = self.joint_mut(id).ok_or(SkelError::InvalidJoint(id.0))?;
        let value = joint.dof(dof) + delta;
        joint.set_dof(dof, value);
        Ok(value)
    }

    /// Rotation limit of one DOF of a joint
    pub fn limit(&self, id: JointId, dof: Dof) -> Option<RotationLimit> {
        self.joint(id).map(|j| j.limit(dof))
    }

    /// Recompute world transforms with the root under the identity
    pub fn update(&mut self) {
        self.update_with(Mat4::IDENTITY);
    }

    /// Recompute world transforms top-down with the root placed under
    /// `parent_world`.
    ///
    /// The traversal list is pre-order, so every parent is finished before
    /// any of its children are visited.
    pub fn update_with(&mut self, parent_world: Mat4) {
        for &id in &self.order {
            let parent = self.joints[id.0]
                .parent
                .map_or(parent_world, |p| self.joints[p.0].world);
            let local = self.joints[id.0].local_matrix();
            self.joints[id.0].world = parent * local;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn sample() -> Skeleton {
        // root
        // ├── a
        // │   └── a1
        // └── b
        let mut builder = SkeletonBuilder::new(Joint::new("root"));
        let a = builder.add_child(JointId::ROOT, Joint::new("a")).unwrap();
        builder.add_child(JointId::ROOT, Joint::new("b")).unwrap();
        builder.add_child(a, Joint::new("a1")).unwrap();
        builder.build()
    }

    #[test]
    fn test_traversal_is_preorder() {
        let skeleton = sample();
        let names: Vec<&str> = skeleton.joints().map(Joint::name).collect();
        assert_eq!(names, vec!["root", "a", "a1", "b"]);
        assert_eq!(skeleton.joint_count(), 4);
    }

    #[test]
    fn test_arena_and_list_indices_differ() {
        let skeleton = sample();
        // "a1" was inserted last but sits third in traversal order
        let a1 = skeleton.find_joint("a1").unwrap();
        assert_eq!(a1.index(), 3);
        assert_eq!(skeleton.list_index(a1), Some(2));
        assert_eq!(skeleton.id_at(2), Some(a1));
        assert_eq!(skeleton.depth(a1), 2);
    }

    #[test]
    fn test_add_child_rejects_unknown_parent() {
        let mut builder = SkeletonBuilder::new(Joint::new("root"));
        assert!(matches!(
            builder.add_child(JointId(5), Joint::new("x")),
            Err(SkelError::InvalidJoint(5))
        ));
    }

    #[test]
    fn test_two_level_chain_world_position() {
        let mut builder =
            SkeletonBuilder::new(Joint::new("root").with_offset(Vec3::new(1.0, 0.0, 0.0)));
        let child = builder
            .add_child(
                JointId::ROOT,
                Joint::new("child").with_offset(Vec3::new(0.0, 1.0, 0.0)),
            )
            .unwrap();
        let mut skeleton = builder.build();
        skeleton.update();

        let origin = skeleton.world_matrix(child).unwrap() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, Vec4::new(1.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_update_with_parent_transform() {
        let mut skeleton = sample();
        skeleton.update_with(Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)));
        for joint in skeleton.joints() {
            assert_eq!(joint.world_position(), Vec3::new(0.0, 0.0, 5.0));
        }
    }

    #[test]
    fn test_nudge_keeps_raw_pose() {
        let mut builder =
            SkeletonBuilder::new(Joint::new("root").with_limit(Dof::Y, -0.1, 0.1));
        builder.add_child(JointId::ROOT, Joint::new("leaf")).unwrap();
        let mut skeleton = builder.build();

        let root = skeleton.root();
        assert_eq!(skeleton.nudge_dof(root, Dof::Y, 0.05).unwrap(), 0.05);
        assert_eq!(skeleton.nudge_dof(root, Dof::Y, 0.2).unwrap(), 0.25);
        let joint = skeleton.joint(root).unwrap();
        assert_eq!(joint.pose().y, 0.25);
        assert_eq!(joint.clamped_pose().y, 0.1);
        assert_eq!(skeleton.nudge_dof(root, Dof::Y, -0.25).unwrap(), 0.0);
        assert!(skeleton.nudge_dof(JointId(9), Dof::Y, 0.1).is_err());
    }
}
