//! Skinned mesh data and linear blend skinning
//!
//! A [`Skin`] holds bind-pose vertices, per-vertex joint weights and one bind
//! matrix per joint. [`Skin::update`] turns the current joint world matrices
//! into skinning matrices (`world * inverse(bind)`), which either a renderer
//! consumes directly or [`Skin::deform`] applies on the CPU.

use crate::error::{Result, SkinError};
use crate::weights::VertexWeights;
use glam::{Mat4, Vec3, Vec4};
use rig_skel::Skeleton;
use std::path::Path;

/// Determinant below which a bind matrix is reported as near-singular
const SINGULAR_EPSILON: f32 = 1e-8;

/// Build a bind matrix from the 12 floats of a `matrix { }` block.
///
/// The values `ax ay az bx by bz cx cy cz dx dy dz` form the rows
/// `(ax ay az dx)`, `(bx by bz dy)`, `(cx cy cz dz)` and `(0 0 0 1)`.
pub fn bind_matrix_from_rows(values: [f32; 12]) -> Mat4 {
    let [ax, ay, az, bx, by, bz, cx, cy, cz, dx, dy, dz] = values;
    Mat4::from_cols(
        Vec4::new(ax, bx, cx, 0.0),
        Vec4::new(ay, by, cy, 0.0),
        Vec4::new(az, bz, cz, 0.0),
        Vec4::new(dx, dy, dz, 1.0),
    )
}

/// Deformed vertex data produced by [`Skin::deform`]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeformedMesh {
    /// Skinned positions, one per vertex
    pub positions: Vec<Vec3>,
    /// Skinned unit normals, one per input normal
    pub normals: Vec<Vec3>,
}

/// A skinned mesh
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Skin {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    weights: Vec<VertexWeights>,
    indices: Vec<u32>,
    bindings: Vec<Mat4>,
    inverse_bindings: Vec<Mat4>,
    skinning: Vec<Mat4>,
}

impl Skin {
    /// Assemble a skin from bind-pose data.
    ///
    /// `weights` is padded with empty entries up to the vertex count. Inverse
    /// bind matrices are computed here and skinning matrices start at the
    /// identity, so the mesh shows its bind pose until the first update.
    /// Bind matrices must be invertible; near-singular ones are logged.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        mut weights: Vec<VertexWeights>,
        indices: Vec<u32>,
        bindings: Vec<Mat4>,
    ) -> Self {
        weights.resize_with(positions.len(), VertexWeights::default);

        let inverse_bindings = bindings
            .iter()
            .enumerate()
            .map(|(i, bind)| {
                if bind.determinant().abs() < SINGULAR_EPSILON {
                    log::warn!("Bind matrix {} is near-singular", i);
                }
                bind.inverse()
            })
            .collect();

        Self {
            skinning: vec![Mat4::IDENTITY; bindings.len()],
            positions,
            normals,
            weights,
            indices,
            bindings,
            inverse_bindings,
        }
    }

    /// Load a skin from a `.skin` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let skin = Self::parse(&text)?;
        log::info!(
            "Loaded skin {} ({} vertices, {} triangles, {} bindings)",
            path.display(),
            skin.vertex_count(),
            skin.triangle_count(),
            skin.bindings.len()
        );
        Ok(skin)
    }

    /// Parse a skin from `.skin` text
    pub fn parse(text: &str) -> Result<Self> {
        crate::parser::parse_skin(text)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Bind-pose positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Bind-pose normals
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Joint weights, one entry per vertex
    pub fn weights(&self) -> &[VertexWeights] {
        &self.weights
    }

    /// Triangle vertex indices as flat triples
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bind matrices, one per joint
    pub fn bindings(&self) -> &[Mat4] {
        &self.bindings
    }

    /// Inverse bind matrices
    pub fn inverse_bindings(&self) -> &[Mat4] {
        &self.inverse_bindings
    }

    /// Skinning matrices from the last update
    pub fn skinning_matrices(&self) -> &[Mat4] {
        &self.skinning
    }

    /// Recompute skinning matrices from the skeleton's world matrices.
    ///
    /// Binding `i` pairs with the joint at position `i` of the traversal
    /// list; bindings past the end of the list get the identity. Without a
    /// skeleton the previous matrices are kept.
    pub fn update(&mut self, skeleton: Option<&Skeleton>) {
        let Some(skeleton) = skeleton else {
            return;
        };

        for (i, (skinning, inverse)) in self
            .skinning
            .iter_mut()
            .zip(&self.inverse_bindings)
            .enumerate()
        {
            *skinning = match skeleton.joint_at(i) {
                Some(joint) => joint.world_matrix() * *inverse,
                None => Mat4::IDENTITY,
            };
        }
    }

    /// Weighted sum of the skinning matrices influencing `vertex`.
    ///
    /// Attachments to joints without a skinning matrix are skipped and the
    /// remaining weights are renormalised. A vertex with no usable weight
    /// stays in its bind pose (identity).
    pub fn blend_matrix(&self, vertex: usize) -> Option<Mat4> {
        let weights = self.weights.get(vertex)?;

        let mut blended = Mat4::ZERO;
        let mut applied = 0.0;
        for attachment in weights.attachments() {
            if let Some(matrix) = self.skinning.get(attachment.joint) {
                blended += *matrix * attachment.weight;
                applied += attachment.weight;
            }
        }

        Some(if applied > 0.0 {
            blended * applied.recip()
        } else {
            Mat4::IDENTITY
        })
    }

    /// Apply the current skinning matrices to every vertex on the CPU.
    ///
    /// Normals beyond the vertex count are copied through unchanged.
    pub fn deform(&self) -> DeformedMesh {
        let blends: Vec<Mat4> = (0..self.vertex_count())
            .map(|v| self.blend_matrix(v).unwrap_or(Mat4::IDENTITY))
            .collect();

        let positions = self
            .positions
            .iter()
            .zip(&blends)
            .map(|(p, m)| m.transform_point3(*p))
            .collect();

        let normals = self
            .normals
            .iter()
            .enumerate()
            .map(|(i, n)| match blends.get(i) {
                Some(m) => m.transform_vector3(*n).normalize_or_zero(),
                None => *n,
            })
            .collect();

        DeformedMesh { positions, normals }
    }

    /// Check that triangles reference existing vertices and attachments
    /// reference existing bindings
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(SkinError::Validation(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }

        let vertices = self.vertex_count();
        if let Some((i, index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertices)
        {
            return Err(SkinError::Validation(format!(
                "triangle {} references vertex {} but the skin has {} vertices",
                i / 3,
                index,
                vertices
            )));
        }

        let bindings = self.bindings.len();
        for (vertex, weights) in self.weights.iter().enumerate() {
            if let Some(attachment) = weights
                .attachments()
                .iter()
                .find(|a| a.joint >= bindings)
            {
                return Err(SkinError::Validation(format!(
                    "vertex {} is attached to joint {} but the skin has {} bindings",
                    vertex, attachment.joint, bindings
                )));
            }
        }

        Ok(())
    }

    /// [`Skin::validate`], then check that every binding has a joint in
    /// `skeleton`
    pub fn validate_for(&self, skeleton: &Skeleton) -> Result<()> {
        self.validate()?;
        if self.bindings.len() > skeleton.joint_count() {
            return Err(SkinError::Validation(format!(
                "skin has {} bindings but the skeleton has {} joints",
                self.bindings.len(),
                skeleton.joint_count()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::Attachment;
    use rig_skel::{Joint, JointId, SkeletonBuilder};

    fn assert_mat4_near(actual: Mat4, expected: Mat4) {
        let diff = actual
            .to_cols_array()
            .iter()
            .zip(expected.to_cols_array())
            .map(|(a, e)| (a - e).abs())
            .fold(0.0f32, f32::max);
        assert!(diff < 1e-5, "expected {expected:?}, got {actual:?}");
    }

    fn weights(pairs: &[(usize, f32)]) -> VertexWeights {
        VertexWeights::from_attachments(
            pairs
                .iter()
                .map(|&(joint, weight)| Attachment { joint, weight }),
        )
    }

    /// Two joints: root at the origin, child one unit up
    fn two_bone() -> Skeleton {
        let mut builder = SkeletonBuilder::new(Joint::new("root"));
        builder
            .add_child(JointId::ROOT, Joint::new("tip").with_offset(Vec3::Y))
            .unwrap();
        let mut skeleton = builder.build();
        skeleton.update();
        skeleton
    }

    fn two_bone_skin() -> Skin {
        Skin::new(
            vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
            vec![Vec3::X, Vec3::X],
            vec![weights(&[(0, 1.0)]), weights(&[(0, 1.0), (1, 1.0)])],
            vec![0, 1, 0],
            vec![Mat4::IDENTITY, Mat4::from_translation(Vec3::Y)],
        )
    }

    #[test]
    fn test_bind_matrix_layout() {
        let m = bind_matrix_from_rows([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 4.0, 5.0, 6.0]);
        assert_eq!(m, Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0)));

        // ax ay az is the first row
        let m = bind_matrix_from_rows([0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_mat4_near(m, Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2));
    }

    #[test]
    fn test_starts_in_bind_pose() {
        let skin = two_bone_skin();
        assert_eq!(skin.skinning_matrices(), &[Mat4::IDENTITY; 2]);
        assert_eq!(skin.deform().positions, skin.positions());
    }

    #[test]
    fn test_world_equal_to_bind_gives_identity() {
        let mut skin = two_bone_skin();
        skin.update(Some(&two_bone()));
        for matrix in skin.skinning_matrices() {
            assert_mat4_near(*matrix, Mat4::IDENTITY);
        }
    }

    #[test]
    fn test_update_without_skeleton_keeps_matrices() {
        let mut skin = two_bone_skin();
        let mut skeleton = two_bone();
        skeleton.set_pose(JointId::ROOT, Vec3::new(0.0, 0.0, 0.3)).unwrap();
        skeleton.update();
        skin.update(Some(&skeleton));
        let before = skin.skinning_matrices().to_vec();

        skin.update(None);
        assert_eq!(skin.skinning_matrices(), before.as_slice());
    }

    #[test]
    fn test_extra_bindings_get_identity() {
        let mut skin = Skin::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![Mat4::IDENTITY, Mat4::from_translation(Vec3::Y), Mat4::from_scale(Vec3::splat(2.0))],
        );
        let mut skeleton = two_bone();
        skeleton.set_offset(JointId::ROOT, Vec3::X).unwrap();
        skeleton.update();
        skin.update(Some(&skeleton));
        assert_mat4_near(skin.skinning_matrices()[0], Mat4::from_translation(Vec3::X));
        assert_eq!(skin.skinning_matrices()[2], Mat4::IDENTITY);
    }

    #[test]
    fn test_blend_and_deform() {
        let mut skin = two_bone_skin();
        let mut skeleton = two_bone();
        let tip = skeleton.find_joint("tip").unwrap();
        skeleton.set_offset(tip, Vec3::new(0.0, 3.0, 0.0)).unwrap();
        skeleton.update();
        skin.update(Some(&skeleton));

        // vertex 1 is half root (unmoved), half tip (moved up by 2)
        let mesh = skin.deform();
        assert_eq!(mesh.positions[0], Vec3::new(1.0, 0.0, 0.0));
        assert!((mesh.positions[1] - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
        assert!((mesh.normals[1] - Vec3::X).length() < 1e-5);
        assert_eq!(skin.blend_matrix(7), None);
    }

    #[test]
    fn test_unweighted_vertex_stays_put() {
        let skin = Skin::new(
            vec![Vec3::ONE],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![Mat4::from_translation(Vec3::X)],
        );
        assert_eq!(skin.weights().len(), 1);
        assert_eq!(skin.blend_matrix(0), Some(Mat4::IDENTITY));
    }

    #[test]
    fn test_missing_binding_renormalises() {
        let skin = Skin::new(
            vec![Vec3::new(2.0, 0.0, 0.0)],
            Vec::new(),
            vec![weights(&[(0, 0.5), (5, 0.5)])],
            Vec::new(),
            vec![Mat4::IDENTITY],
        );
        assert_mat4_near(skin.blend_matrix(0).unwrap(), Mat4::IDENTITY);
        assert!((skin.deform().positions[0] - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_validate() {
        let skin = two_bone_skin();
        assert!(skin.validate().is_ok());

        let bad_triangle = Skin::new(
            vec![Vec3::ZERO; 2],
            Vec::new(),
            Vec::new(),
            vec![0, 1, 2],
            Vec::new(),
        );
        assert!(matches!(bad_triangle.validate(), Err(SkinError::Validation(_))));

        let bad_joint = Skin::new(
            vec![Vec3::ZERO],
            Vec::new(),
            vec![weights(&[(3, 1.0)])],
            Vec::new(),
            vec![Mat4::IDENTITY],
        );
        assert!(matches!(bad_joint.validate(), Err(SkinError::Validation(_))));

        let single = Skeleton::parse("balljoint only { }").unwrap();
        assert!(skin.validate_for(&two_bone()).is_ok());
        assert!(skin.validate_for(&single).is_err());
    }
}
