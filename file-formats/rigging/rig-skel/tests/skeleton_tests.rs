//! Integration tests for skeleton loading and hierarchy updates

use glam::{Mat4, Vec3, Vec4};
use pretty_assertions::assert_eq;
use rig_skel::{Dof, JointId, SkelError, Skeleton};
use std::f32::consts::FRAC_PI_2;
use std::io::Write;
use tempfile::NamedTempFile;

const ARM_SKEL: &str = "
# simple arm
balljoint shoulder {
    offset 0 1.5 0
    rotzlimit -1.0 1.0
    balljoint elbow {
        offset 1 0 0
        rotylimit -2.0 0
        balljoint wrist {
            offset 1 0 0
            boxmin -0.05 -0.05 -0.05
            boxmax 0.05 0.05 0.05
        }
    }
    balljoint clavicle {
        offset -0.5 0 0
    }
}
";

fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).abs().max_element() < 1e-5,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(ARM_SKEL.as_bytes()).unwrap();

    let skeleton = Skeleton::load(file.path()).unwrap();
    let names: Vec<&str> = skeleton.joints().map(|j| j.name()).collect();
    assert_eq!(names, vec!["shoulder", "elbow", "wrist", "clavicle"]);
}

#[test]
fn test_load_missing_file() {
    let result = Skeleton::load("/definitely/not/here.skel");
    assert!(matches!(result, Err(SkelError::Io(_))));
}

#[test]
fn test_rest_pose_world_positions() {
    let mut skeleton = Skeleton::parse(ARM_SKEL).unwrap();
    skeleton.update();

    let wrist = skeleton.find_joint("wrist").unwrap();
    let clavicle = skeleton.find_joint("clavicle").unwrap();
    assert_vec3_near(
        skeleton.world_position(wrist).unwrap(),
        Vec3::new(2.0, 1.5, 0.0),
    );
    assert_vec3_near(
        skeleton.world_position(clavicle).unwrap(),
        Vec3::new(-0.5, 1.5, 0.0),
    );
}

#[test]
fn test_parent_rotation_carries_children() {
    let mut skeleton = Skeleton::parse(ARM_SKEL).unwrap();
    let shoulder = skeleton.root();
    skeleton
        .set_pose(shoulder, Vec3::new(0.0, 0.0, 0.5))
        .unwrap();
    skeleton.update();

    let wrist = skeleton.find_joint("wrist").unwrap();
    let expected = Vec3::new(0.0, 1.5, 0.0) + 2.0 * Vec3::new(0.5f32.cos(), 0.5f32.sin(), 0.0);
    assert_vec3_near(skeleton.world_position(wrist).unwrap(), expected);
}

#[test]
fn test_pose_outside_limits_is_clamped() {
    let mut clamped = Skeleton::parse(ARM_SKEL).unwrap();
    let mut reference = Skeleton::parse(ARM_SKEL).unwrap();
    let elbow = clamped.find_joint("elbow").unwrap();

    // rotylimit is [-2, 0], so +1.2 must behave like 0 and -3 like -2
    clamped.set_pose(elbow, Vec3::new(0.0, 1.2, 0.0)).unwrap();
    clamped.update();
    reference.update();
    assert_eq!(
        clamped.world_matrix(elbow).unwrap(),
        reference.world_matrix(elbow).unwrap()
    );

    clamped.set_pose(elbow, Vec3::new(0.0, -3.0, 0.0)).unwrap();
    reference.set_pose(elbow, Vec3::new(0.0, -2.0, 0.0)).unwrap();
    clamped.update();
    reference.update();
    let wrist = clamped.find_joint("wrist").unwrap();
    assert_vec3_near(
        clamped.world_position(wrist).unwrap(),
        reference.world_position(wrist).unwrap(),
    );

    // the stored pose keeps the raw input
    assert_eq!(clamped.pose(elbow), Some(Vec3::new(0.0, -3.0, 0.0)));
}

#[test]
fn test_world_matrix_matches_manual_composition() {
    let mut skeleton = Skeleton::parse(ARM_SKEL).unwrap();
    let elbow = skeleton.find_joint("elbow").unwrap();
    skeleton.set_dof(elbow, Dof::Y, -FRAC_PI_2).unwrap();
    skeleton.update();

    let shoulder_world = Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0));
    let elbow_local =
        Mat4::from_translation(Vec3::X) * Mat4::from_rotation_y(-FRAC_PI_2);
    let expected = shoulder_world * elbow_local;

    let actual = skeleton.world_matrix(elbow).unwrap();
    for (a, e) in actual.to_cols_array().iter().zip(expected.to_cols_array()) {
        assert!((a - e).abs() < 1e-6);
    }

    // rotating -90 degrees about Y swings the +X child offset to +Z
    let wrist = skeleton.find_joint("wrist").unwrap();
    let p = skeleton.world_matrix(wrist).unwrap() * Vec4::W;
    assert_vec3_near(p.truncate(), Vec3::new(1.0, 1.5, 1.0));
}

#[test]
fn test_rotation_limit_accessors() {
    let skeleton = Skeleton::parse(ARM_SKEL).unwrap();
    let limit = skeleton.limit(JointId::ROOT, Dof::Z).unwrap();
    assert_eq!((limit.min, limit.max), (-1.0, 1.0));

    let wrist = skeleton.joint(skeleton.find_joint("wrist").unwrap()).unwrap();
    assert_eq!(wrist.box_min(), Vec3::splat(-0.05));
    assert_eq!(wrist.box_max(), Vec3::splat(0.05));
}

#[test]
fn test_children_and_parents() {
    let skeleton = Skeleton::parse(ARM_SKEL).unwrap();
    let root = skeleton.root();
    let children: Vec<&str> = skeleton
        .children(root)
        .iter()
        .map(|&id| skeleton.joint(id).unwrap().name())
        .collect();
    assert_eq!(children, vec!["elbow", "clavicle"]);

    let wrist = skeleton.find_joint("wrist").unwrap();
    let elbow = skeleton.find_joint("elbow").unwrap();
    assert_eq!(skeleton.parent(wrist), Some(elbow));
    assert_eq!(skeleton.parent(root), None);
}
