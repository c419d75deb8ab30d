//! rig-rs library
//!
//! Playback session and command implementations behind the `rig` CLI. The
//! [`Session`] ties a skeleton, a skin and an animation together and runs the
//! per-frame order: animation, skeleton, skin.

pub mod cli;
pub mod clock;
pub mod commands;
pub mod session;
pub mod utils;

pub use clock::{PlaybackClock, PlaybackMode};
pub use session::{AssetKind, Session, SessionConfig};
