//! Parser and joint hierarchy for `.skel` skeleton files.
//!
//! A skeleton is a tree of ball joints. Each joint carries a translation
//! offset from its parent, a three-DOF Euler pose with per-axis limits and a
//! bounding box. [`Skeleton::update`] composes local transforms top-down into
//! world transforms.
//!
//! # Examples
//!
//! ```
//! use rig_skel::Skeleton;
//!
//! let mut skeleton = Skeleton::parse(
//!     "balljoint root { offset 1 0 0 balljoint tip { offset 0 1 0 } }",
//! )?;
//! skeleton.update();
//!
//! let tip = skeleton.find_joint("tip").unwrap();
//! assert_eq!(skeleton.world_position(tip), Some(glam::Vec3::new(1.0, 1.0, 0.0)));
//! # Ok::<(), rig_skel::SkelError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod joint;
pub mod parser;
pub mod skeleton;

pub use error::{Result, SkelError};
pub use joint::{DOF_STEP, Dof, Joint, JointId, RotationLimit};
pub use skeleton::{Skeleton, SkeletonBuilder};
