//! Playback time for a session

use std::fmt;

/// How playback time relates to the animation's `[start, end]` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlaybackMode {
    /// Time runs unbounded; channel extrapolation decides what happens
    #[default]
    Free,
    /// Time stops at either end of the range
    Clamp,
    /// Time wraps from the end back to the start
    Loop,
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Free => "free",
            Self::Clamp => "clamp",
            Self::Loop => "loop",
        })
    }
}

/// Time cursor advanced by the host every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    time: f32,
    playing: bool,
    mode: PlaybackMode,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(PlaybackMode::default())
    }
}

impl PlaybackClock {
    /// A playing clock at time 0
    pub fn new(mode: PlaybackMode) -> Self {
        Self {
            time: 0.0,
            playing: true,
            mode,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flip between playing and paused, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Advance by `dt` seconds if playing, then apply the mode against
    /// `range`
    pub fn advance(&mut self, dt: f32, range: Option<(f32, f32)>) {
        if self.playing {
            self.seek(self.time + dt, range);
        }
    }

    /// Jump to `time`, then apply the mode against `range`
    pub fn seek(&mut self, time: f32, range: Option<(f32, f32)>) {
        self.time = match (self.mode, range) {
            (PlaybackMode::Clamp, Some((start, end))) if end >= start => time.clamp(start, end),
            (PlaybackMode::Loop, Some((start, end))) if end > start => {
                start + (time - start).rem_euclid(end - start)
            }
            _ => time,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_runs_past_end() {
        let mut clock = PlaybackClock::new(PlaybackMode::Free);
        clock.advance(3.0, Some((0.0, 2.0)));
        assert_eq!(clock.time(), 3.0);
    }

    #[test]
    fn test_clamp_holds_ends() {
        let mut clock = PlaybackClock::new(PlaybackMode::Clamp);
        clock.advance(3.0, Some((0.0, 2.0)));
        assert_eq!(clock.time(), 2.0);
        clock.seek(-1.0, Some((0.0, 2.0)));
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_loop_wraps() {
        let mut clock = PlaybackClock::new(PlaybackMode::Loop);
        clock.seek(1.0, Some((1.0, 3.0)));
        clock.advance(2.5, Some((1.0, 3.0)));
        assert_eq!(clock.time(), 1.5);
        clock.seek(0.5, Some((1.0, 3.0)));
        assert_eq!(clock.time(), 2.5);

        // an empty range cannot loop
        clock.seek(7.0, Some((1.0, 1.0)));
        assert_eq!(clock.time(), 7.0);
    }

    #[test]
    fn test_paused_clock_does_not_advance() {
        let mut clock = PlaybackClock::default();
        clock.pause();
        clock.advance(1.0, None);
        assert_eq!(clock.time(), 0.0);
        assert!(clock.toggle());
        clock.advance(1.0, None);
        assert_eq!(clock.time(), 1.0);
    }
}
