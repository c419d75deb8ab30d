//! `.skel` text parser
//!
//! ```text
//! balljoint root {
//!     offset 0 0 0
//!     boxmin -0.1 -0.1 -0.1
//!     boxmax 0.1 0.1 0.1
//!     rotxlimit -1.5 1.5
//!     pose 0 0 0
//!     balljoint child { ... }
//! }
//! ```

use crate::error::{Result, SkelError};
use crate::joint::{Dof, Joint, JointId, RotationLimit};
use crate::skeleton::{Skeleton, SkeletonBuilder};
use glam::Vec3;
use rig_utils::Tokenizer;

/// Parse the first `balljoint` in `text` as the skeleton root.
///
/// Tokens before the root are ignored, and so is anything after it.
pub fn parse_skeleton(text: &str) -> Result<Skeleton> {
    let mut tokenizer = Tokenizer::new(text);

    while let Some(token) = tokenizer.next_token() {
        if token == "balljoint" {
            let skeleton = parse_hierarchy(&mut tokenizer)?;
            log::debug!("Parsed skeleton with {} joints", skeleton.joint_count());
            return Ok(skeleton);
        }
    }

    Err(SkelError::MissingRoot)
}

fn read_vec3(tokenizer: &mut Tokenizer<'_>) -> Result<Vec3> {
    Ok(Vec3::from_array(tokenizer.read_f32s::<3>()?))
}

fn read_limit(tokenizer: &mut Tokenizer<'_>) -> Result<RotationLimit> {
    let [min, max] = tokenizer.read_f32s::<2>()?;
    Ok(RotationLimit::new(min, max))
}

/// `<name> {`; the `balljoint` keyword is already consumed
fn open_joint(tokenizer: &mut Tokenizer<'_>) -> Result<Joint> {
    let name = tokenizer.token()?;
    tokenizer.expect("{")?;
    Ok(Joint::new(name))
}

/// Parse the root joint body and everything nested in it.
///
/// Joints go into the arena as soon as their header is read; `open` holds
/// the joints whose closing brace has not been seen yet.
fn parse_hierarchy(tokenizer: &mut Tokenizer<'_>) -> Result<Skeleton> {
    let mut builder = SkeletonBuilder::new(open_joint(tokenizer)?);
    let mut open = vec![JointId::ROOT];

    while let Some(&current) = open.last() {
        match tokenizer.token()? {
            "}" => {
                open.pop();
            }
            "balljoint" => {
                let child = builder.add_child(current, open_joint(tokenizer)?)?;
                open.push(child);
            }
            token => {
                let joint = builder
                    .joint_mut(current)
                    .ok_or(SkelError::InvalidJoint(current.index()))?;
                match token {
                    "offset" => joint.set_offset(read_vec3(tokenizer)?),
                    "boxmin" => joint.set_box_min(read_vec3(tokenizer)?),
                    "boxmax" => joint.set_box_max(read_vec3(tokenizer)?),
                    "rotxlimit" => joint.set_limit(Dof::X, read_limit(tokenizer)?),
                    "rotylimit" => joint.set_limit(Dof::Y, read_limit(tokenizer)?),
                    "rotzlimit" => joint.set_limit(Dof::Z, read_limit(tokenizer)?),
                    "pose" => joint.set_pose(read_vec3(tokenizer)?),
                    other => {
                        log::warn!(
                            "Unknown token '{}' in joint '{}' at line {}",
                            other,
                            joint.name(),
                            tokenizer.line()
                        );
                    }
                }
            }
        }
    }

    Ok(builder.build())
}
