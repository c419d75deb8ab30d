//! Ball joints: offset, three rotational DOFs, limits and world transform

use glam::{Mat4, Vec3};
use std::f32::consts::PI;

/// Step applied by [`crate::Skeleton::nudge_dof`] callers that mimic the
/// interactive `+`/`-` pose editor (radians)
pub const DOF_STEP: f32 = 0.05;

/// Stable handle of a joint inside a [`crate::Skeleton`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointId(pub(crate) usize);

impl JointId {
    /// The root joint always occupies the first arena slot
    pub const ROOT: Self = Self(0);

    /// Arena slot of this joint
    pub fn index(self) -> usize {
        self.0
    }
}

/// One rotational degree of freedom of a ball joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dof {
    /// Rotation about the local X axis
    X,
    /// Rotation about the local Y axis
    Y,
    /// Rotation about the local Z axis
    Z,
}

impl Dof {
    /// All DOFs in channel order
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index into a pose vector
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Parse `x`, `y` or `z` (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::X => "Rotate X",
            Self::Y => "Rotate Y",
            Self::Z => "Rotate Z",
        }
    }
}

/// Inclusive `[min, max]` range for one rotational DOF
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationLimit {
    /// Lower bound (radians)
    pub min: f32,
    /// Upper bound (radians)
    pub max: f32,
}

impl RotationLimit {
    /// Create a limit from its bounds
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range.
    ///
    /// Written as `max` then `min` so an inverted range never panics; the
    /// upper bound wins in that case.
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }

    /// Whether `value` lies inside the range
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for RotationLimit {
    fn default() -> Self {
        Self::new(-PI, PI)
    }
}

/// A ball joint in a skeleton
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Joint {
    name: String,
    offset: Vec3,
    pose: Vec3,
    limits: [RotationLimit; 3],
    box_min: Vec3,
    box_max: Vec3,
    pub(crate) parent: Option<JointId>,
    pub(crate) children: Vec<JointId>,
    pub(crate) world: Mat4,
}

impl Joint {
    /// Create an unattached joint with default offset, pose, limits and box
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: Vec3::ZERO,
            pose: Vec3::ZERO,
            limits: [RotationLimit::default(); 3],
            box_min: Vec3::splat(-0.1),
            box_max: Vec3::splat(0.1),
            parent: None,
            children: Vec::new(),
            world: Mat4::IDENTITY,
        }
    }

    /// Builder: set the translation from the parent
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Builder: set the initial pose
    pub fn with_pose(mut self, pose: Vec3) -> Self {
        self.pose = pose;
        self
    }

    /// Builder: set the limit of one DOF
    pub fn with_limit(mut self, dof: Dof, min: f32, max: f32) -> Self {
        self.limits[dof.index()] = RotationLimit::new(min, max);
        self
    }

    /// Builder: set the bounding box extents
    pub fn with_box(mut self, min: Vec3, max: Vec3) -> Self {
        self.box_min = min;
        self.box_max = max;
        self
    }

    pub(crate) fn set_limit(&mut self, dof: Dof, limit: RotationLimit) {
        self.limits[dof.index()] = limit;
    }

    pub(crate) fn set_box_min(&mut self, min: Vec3) {
        self.box_min = min;
    }

    pub(crate) fn set_box_max(&mut self, max: Vec3) {
        self.box_max = max;
    }

    /// Joint name; not required to be unique
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Translation from the parent joint
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Replace the translation from the parent joint
    pub fn set_offset(&mut self, offset: Vec3) {
        self.offset = offset;
    }

    /// Raw pose as stored (may lie outside the limits)
    pub fn pose(&self) -> Vec3 {
        self.pose
    }

    /// Replace the pose
    pub fn set_pose(&mut self, pose: Vec3) {
        self.pose = pose;
    }

    /// Set a single DOF of the pose
    pub fn set_dof(&mut self, dof: Dof, value: f32) {
        self.pose[dof.index()] = value;
    }

    /// Current value of a single DOF
    pub fn dof(&self, dof: Dof) -> f32 {
        self.pose[dof.index()]
    }

    /// Limit of one DOF
    pub fn limit(&self, dof: Dof) -> RotationLimit {
        self.limits[dof.index()]
    }

    /// Limits in X, Y, Z order
    pub fn limits(&self) -> &[RotationLimit; 3] {
        &self.limits
    }

    /// Lower corner of the bounding box
    pub fn box_min(&self) -> Vec3 {
        self.box_min
    }

    /// Upper corner of the bounding box
    pub fn box_max(&self) -> Vec3 {
        self.box_max
    }

    /// Parent joint, `None` for the root
    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    /// Children in the order they were added
    pub fn children(&self) -> &[JointId] {
        &self.children
    }

    /// Pose with every component clamped to its limit
    pub fn clamped_pose(&self) -> Vec3 {
        Vec3::new(
            self.limits[0].clamp(self.pose.x),
            self.limits[1].clamp(self.pose.y),
            self.limits[2].clamp(self.pose.z),
        )
    }

    /// `Translate(offset) * RotZ * RotY * RotX` using the clamped pose
    pub fn local_matrix(&self) -> Mat4 {
        let pose = self.clamped_pose();
        Mat4::from_translation(self.offset)
            * Mat4::from_rotation_z(pose.z)
            * Mat4::from_rotation_y(pose.y)
            * Mat4::from_rotation_x(pose.x)
    }

    /// World transform computed by the last skeleton update
    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    /// Origin of the joint in world space
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_defaults() {
        let joint = Joint::new("hip");
        assert_eq!(joint.name(), "hip");
        assert_eq!(joint.offset(), Vec3::ZERO);
        assert_eq!(joint.box_min(), Vec3::splat(-0.1));
        assert_eq!(joint.box_max(), Vec3::splat(0.1));
        for limit in joint.limits() {
            assert_eq!(*limit, RotationLimit::new(-PI, PI));
        }
        assert_eq!(joint.world_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_limit_clamp_is_inclusive() {
        let limit = RotationLimit::new(-0.5, 0.5);
        assert_eq!(limit.clamp(0.5), 0.5);
        assert_eq!(limit.clamp(-0.5), -0.5);
        assert_eq!(limit.clamp(2.0), 0.5);
        assert_eq!(limit.clamp(-2.0), -0.5);
        assert!(limit.contains(0.5));
        assert!(!limit.contains(0.51));
    }

    #[test]
    fn test_inverted_limit_does_not_panic() {
        let limit = RotationLimit::new(1.0, -1.0);
        assert_eq!(limit.clamp(0.0), -1.0);
    }

    #[test]
    fn test_clamped_pose_leaves_stored_pose() {
        let joint = Joint::new("knee")
            .with_limit(Dof::X, 0.0, 1.0)
            .with_pose(Vec3::new(3.0, 0.2, -9.0));
        assert_eq!(joint.pose(), Vec3::new(3.0, 0.2, -9.0));
        assert!(approx_eq(joint.clamped_pose(), Vec3::new(1.0, 0.2, -PI)));
    }

    #[test]
    fn test_local_matrix_rotation_order() {
        // X is applied first: rotating +Y by 90 degrees about X gives +Z,
        // then 90 degrees about Z leaves +Z untouched.
        let joint = Joint::new("j").with_pose(Vec3::new(
            std::f32::consts::FRAC_PI_2,
            0.0,
            std::f32::consts::FRAC_PI_2,
        ));
        let v = joint.local_matrix() * Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert!(approx_eq(v.truncate(), Vec3::Z));
    }

    #[test]
    fn test_local_matrix_translation() {
        let joint = Joint::new("j").with_offset(Vec3::new(1.0, 2.0, 3.0));
        let p = joint.local_matrix().transform_point3(Vec3::ZERO);
        assert!(approx_eq(p, Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_dof_names() {
        assert_eq!(Dof::from_name("Y"), Some(Dof::Y));
        assert_eq!(Dof::from_name("w"), None);
        assert_eq!(Dof::Z.label(), "Rotate Z");
        assert_eq!(Dof::ALL.map(Dof::index), [0, 1, 2]);
    }
}
