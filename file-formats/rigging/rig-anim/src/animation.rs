//! Animation clips: a time range plus an ordered set of channels

use crate::binding::ChannelMap;
use crate::channel::Channel;
use crate::error::Result;
use rig_skel::Skeleton;
use std::path::Path;

/// A loaded `.anim` clip
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Animation {
    start: f32,
    end: f32,
    channels: Vec<Channel>,
}

impl Animation {
    /// Create an animation from already-built channels
    pub fn new(start: f32, end: f32, channels: Vec<Channel>) -> Self {
        Self {
            start,
            end,
            channels,
        }
    }

    /// Load an animation from an `.anim` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let animation = Self::parse(&text)?;
        log::info!(
            "Loaded animation {} ({} channels, {}s)",
            path.display(),
            animation.channel_count(),
            animation.duration()
        );
        Ok(animation)
    }

    /// Parse an animation from `.anim` text
    pub fn parse(text: &str) -> Result<Self> {
        crate::parser::parse_animation(text)
    }

    /// Start of the authored range
    pub fn start(&self) -> f32 {
        self.start
    }

    /// End of the authored range
    pub fn end(&self) -> f32 {
        self.end
    }

    /// `(start, end)`
    pub fn range(&self) -> (f32, f32) {
        (self.start, self.end)
    }

    /// Length of the authored range, never negative
    pub fn duration(&self) -> f32 {
        (self.end - self.start).max(0.0)
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// All channels in file order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel by index
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Value of one channel at `time`; missing channels read as 0
    pub fn evaluate_channel(&self, index: usize, time: f32) -> f32 {
        self.channels.get(index).map_or(0.0, |c| c.evaluate(time))
    }

    /// Pose `skeleton` at `time`.
    ///
    /// Channels 0..3 replace the root offset, then consecutive triples become
    /// the rotation of each joint in traversal order until channels run out.
    /// Does nothing without a skeleton or with fewer than three channels.
    pub fn evaluate(&self, time: f32, skeleton: Option<&mut Skeleton>) {
        let Some(skeleton) = skeleton else {
            return;
        };
        ChannelMap::positional(self.channel_count(), skeleton).apply(self, time, skeleton);
    }

    /// `(time, value)` pairs of one channel from `from` to `to` inclusive.
    ///
    /// Returns an empty list for an unknown channel or a non-positive step.
    pub fn sample(&self, channel: usize, from: f32, to: f32, step: f32) -> Vec<(f32, f32)> {
        let Some(channel) = self.channels.get(channel) else {
            return Vec::new();
        };
        if step <= 0.0 || to < from {
            return Vec::new();
        }

        // Multiply instead of accumulating so long ranges do not drift
        let steps = ((to - from) / step + 1e-4).floor() as usize;
        (0..=steps)
            .map(|i| {
                let time = from + step * i as f32;
                (time, channel.evaluate(time))
            })
            .collect()
    }
}
