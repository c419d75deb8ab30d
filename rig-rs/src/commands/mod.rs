//! Command implementations for the rig CLI

pub mod anim;
pub mod play;
pub mod pose;
pub mod skel;
pub mod skin;
pub mod validate;
