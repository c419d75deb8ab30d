//! Keyframe channels and skeleton animation for `.anim` files.
//!
//! Each [`Channel`] is a scalar cubic Hermite curve with per-key tangent
//! rules and extrapolation before and after its keys. An [`Animation`] groups
//! channels: the first three translate the skeleton root, the rest rotate
//! joints three at a time in traversal order. A [`ChannelMap`] makes that
//! pairing explicit so it can be checked against a skeleton.
//!
//! # Examples
//!
//! ```
//! use rig_anim::{Animation, ChannelMap};
//! use rig_skel::Skeleton;
//!
//! let animation = Animation::parse(
//!     "animation {
//!         range 0 1
//!         numchannels 3
//!         channel { keys 2 { 0 0 linear linear 1 2 linear linear } }
//!         channel { }
//!         channel { }
//!     }",
//! )?;
//! let mut skeleton = Skeleton::parse("balljoint root { }")?;
//!
//! let map = ChannelMap::bind(&animation, &skeleton);
//! map.apply(&animation, 0.5, &mut skeleton);
//! skeleton.update();
//!
//! assert_eq!(skeleton.world_position(skeleton.root()), Some(glam::Vec3::new(1.0, 0.0, 0.0)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod animation;
pub mod binding;
pub mod channel;
pub mod error;
pub mod keyframe;
pub mod parser;

pub use animation::Animation;
pub use binding::{ChannelMap, JointChannels, expected_channels};
pub use channel::{Channel, Extrapolation};
pub use error::{AnimError, Result};
pub use keyframe::{Keyframe, Tangent};
