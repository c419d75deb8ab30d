//! Parser and linear blend skinning for `.skin` mesh files.
//!
//! A skin binds mesh vertices to the joints of a [`rig_skel::Skeleton`].
//! Each vertex keeps up to four normalised joint weights and each joint has
//! a bind matrix. After the skeleton is updated, [`Skin::update`] computes the
//! per-joint skinning matrices and [`Skin::deform`] blends them per vertex.
//!
//! # Examples
//!
//! ```
//! use rig_skel::Skeleton;
//! use rig_skin::Skin;
//!
//! let mut skin = Skin::parse(
//!     "positions 1 { 0 1 0 }
//!      skinweights 1 { 1 0 1 }
//!      bindings 1 { matrix { 1 0 0 0 1 0 0 0 1 0 0 0 } }",
//! )?;
//! let mut skeleton = Skeleton::parse("balljoint root { offset 2 0 0 }")?;
//! skeleton.update();
//!
//! skin.update(Some(&skeleton));
//! assert_eq!(skin.deform().positions[0], glam::Vec3::new(2.0, 1.0, 0.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod parser;
pub mod skin;
pub mod weights;

pub use error::{Result, SkinError};
pub use skin::{DeformedMesh, Skin, bind_matrix_from_rows};
pub use weights::{Attachment, MAX_ATTACHMENTS, VertexWeights};
