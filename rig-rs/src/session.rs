//! Session context: the loaded assets, their channel binding and the clock.
//!
//! A [`Session`] owns at most one skeleton, one skin and one animation.
//! Every load parses into a fresh value and only replaces the current asset
//! once parsing (and, for strict sessions, channel binding) succeeded.

use crate::clock::{PlaybackClock, PlaybackMode};
use anyhow::{Context, Result, anyhow, bail};
use rig_anim::{Animation, ChannelMap};
use rig_skel::{Dof, JointId, Skeleton};
use rig_skin::Skin;
use std::fmt;
use std::path::{Path, PathBuf};

/// Runtime options of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Time behaviour at the ends of the animation range
    pub playback: PlaybackMode,
    /// Refuse animations whose channel count does not match the skeleton
    pub strict_mapping: bool,
}

/// The asset slots of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// `.skel`
    Skeleton,
    /// `.skin`
    Skin,
    /// `.anim`
    Animation,
}

impl AssetKind {
    /// Kind implied by a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "skel" => Some(Self::Skeleton),
            "skin" => Some(Self::Skin),
            "anim" => Some(Self::Animation),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skeleton => "skeleton",
            Self::Skin => "skin",
            Self::Animation => "animation",
        })
    }
}

/// Loaded assets plus playback state
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    skeleton: Option<Skeleton>,
    skin: Option<Skin>,
    animation: Option<Animation>,
    channel_map: Option<ChannelMap>,
    clock: PlaybackClock,
    last_path: Option<PathBuf>,
}

impl Session {
    /// Empty session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            clock: PlaybackClock::new(config.playback),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    pub fn skin(&self) -> Option<&Skin> {
        self.skin.as_ref()
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Channel binding of the current animation and skeleton
    pub fn channel_map(&self) -> Option<&ChannelMap> {
        self.channel_map.as_ref()
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }

    /// Current playback time
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    /// Path of the last successful load
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    /// Load an asset, choosing the slot by file extension.
    ///
    /// Loading an animation rewinds the clock to its start. Loading a
    /// skeleton or animation rebinds the channel map.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<AssetKind> {
        let path = path.as_ref();
        let kind = AssetKind::from_path(path).ok_or_else(|| {
            anyhow!(
                "Unrecognised asset type: {} (expected .skel, .skin or .anim)",
                path.display()
            )
        })?;

        match kind {
            AssetKind::Skeleton => {
                let skeleton = Skeleton::load(path)
                    .with_context(|| format!("Failed to load skeleton from {}", path.display()))?;
                let map = self.bind(self.animation.as_ref(), Some(&skeleton))?;
                self.skeleton = Some(skeleton);
                self.channel_map = map;
            }
            AssetKind::Skin => {
                let skin = Skin::load(path)
                    .with_context(|| format!("Failed to load skin from {}", path.display()))?;
                self.skin = Some(skin);
            }
            AssetKind::Animation => {
                let animation = Animation::load(path).with_context(|| {
                    format!("Failed to load animation from {}", path.display())
                })?;
                let map = self.bind(Some(&animation), self.skeleton.as_ref())?;
                self.clock.seek(animation.start(), Some(animation.range()));
                self.animation = Some(animation);
                self.channel_map = map;
            }
        }

        self.last_path = Some(path.to_path_buf());
        self.update();
        Ok(kind)
    }

    /// Load the last successfully loaded path again
    pub fn reload(&mut self) -> Result<AssetKind> {
        let path = self
            .last_path
            .clone()
            .ok_or_else(|| anyhow!("Nothing has been loaded yet"))?;
        self.load(path)
    }

    /// Drop an asset slot
    pub fn unload(&mut self, kind: AssetKind) {
        match kind {
            AssetKind::Skeleton => self.skeleton = None,
            AssetKind::Skin => self.skin = None,
            AssetKind::Animation => self.animation = None,
        }
        if kind != AssetKind::Skin {
            self.channel_map = None;
        }
        log::debug!("Unloaded {}", kind);
    }

    fn bind(
        &self,
        animation: Option<&Animation>,
        skeleton: Option<&Skeleton>,
    ) -> Result<Option<ChannelMap>> {
        let (Some(animation), Some(skeleton)) = (animation, skeleton) else {
            return Ok(None);
        };
        let map = if self.config.strict_mapping {
            ChannelMap::bind_strict(animation, skeleton)?
        } else {
            ChannelMap::bind(animation, skeleton)
        };
        Ok(Some(map))
    }

    /// Move the clock to `time` (subject to the playback mode) and update
    pub fn seek(&mut self, time: f32) {
        let range = self.animation.as_ref().map(Animation::range);
        self.clock.seek(time, range);
        self.update();
    }

    /// Advance the clock by `dt` seconds, then update
    pub fn tick(&mut self, dt: f32) {
        let range = self.animation.as_ref().map(Animation::range);
        self.clock.advance(dt, range);
        self.update();
    }

    /// Run one frame at the current time: animation, then skeleton, then skin
    pub fn update(&mut self) {
        self.apply_animation();
        self.update_hierarchy();
    }

    /// Write the animation at the current time into the skeleton pose
    pub fn apply_animation(&mut self) {
        if let (Some(animation), Some(skeleton), Some(map)) = (
            self.animation.as_ref(),
            self.skeleton.as_mut(),
            self.channel_map.as_ref(),
        ) {
            map.apply(animation, self.clock.time(), skeleton);
        }
    }

    /// Recompute world matrices, then skinning matrices. Without a skeleton
    /// the skin keeps its previous matrices.
    pub fn update_hierarchy(&mut self) {
        if let Some(skeleton) = self.skeleton.as_mut() {
            skeleton.update();
        }
        if let Some(skin) = self.skin.as_mut() {
            skin.update(self.skeleton.as_ref());
        }
    }

    fn joint_at(&self, index: usize) -> Result<JointId> {
        let skeleton = self
            .skeleton
            .as_ref()
            .ok_or_else(|| anyhow!("No skeleton loaded"))?;
        match skeleton.id_at(index) {
            Some(id) => Ok(id),
            None => bail!(
                "Joint index {} out of range (skeleton has {} joints)",
                index,
                skeleton.joint_count()
            ),
        }
    }

    /// Set one DOF of the joint at `index` in the traversal list
    pub fn set_dof(&mut self, index: usize, dof: Dof, value: f32) -> Result<()> {
        let id = self.joint_at(index)?;
        if let Some(skeleton) = self.skeleton.as_mut() {
            skeleton.set_dof(id, dof, value)?;
        }
        Ok(())
    }

    /// Nudge one DOF of the joint at `index` by `delta`, staying within its
    /// limit; returns the new value
    pub fn nudge_dof(&mut self, index: usize, dof: Dof, delta: f32) -> Result<f32> {
        let id = self.joint_at(index)?;
        let skeleton = self
            .skeleton
            .as_mut()
            .ok_or_else(|| anyhow!("No skeleton loaded"))?;
        Ok(skeleton.nudge_dof(id, dof, delta)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_from_path() {
        assert_eq!(
            AssetKind::from_path(Path::new("a/b/wasp.skel")),
            Some(AssetKind::Skeleton)
        );
        assert_eq!(
            AssetKind::from_path(Path::new("WASP.SKIN")),
            Some(AssetKind::Skin)
        );
        assert_eq!(
            AssetKind::from_path(Path::new("walk.anim")),
            Some(AssetKind::Animation)
        );
        assert_eq!(AssetKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(AssetKind::from_path(Path::new("skel")), None);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let mut session = Session::default();
        let err = session.load("model.obj").unwrap_err();
        assert!(err.to_string().contains("Unrecognised asset type"));
        assert!(session.last_path().is_none());
    }

    #[test]
    fn test_edits_need_a_skeleton() {
        let mut session = Session::default();
        assert!(session.set_dof(0, Dof::X, 1.0).is_err());
        assert!(session.nudge_dof(0, Dof::X, 0.05).is_err());
        assert!(session.reload().is_err());
        session.update();
    }
}
