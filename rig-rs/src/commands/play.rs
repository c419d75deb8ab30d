//! Frame-by-frame playback

use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::clock::PlaybackMode;
use crate::session::{Session, SessionConfig};
use crate::utils::{add_table_row, create_table};

/// Arguments of `rig play`
#[derive(Debug, Clone)]
pub struct PlayArgs {
    pub skel: PathBuf,
    pub anim: PathBuf,
    pub fps: f32,
    pub frames: Option<usize>,
    pub mode: PlaybackMode,
    pub strict: bool,
}

/// One played frame: index, time and root world position
pub type Frame = (usize, f32, glam::Vec3);

/// Frames of a playback run, produced one tick at a time
#[derive(Debug)]
pub struct Playback {
    session: Session,
    dt: f32,
    next: usize,
    frames: usize,
}

impl Playback {
    /// Number of frames the run will produce in total
    pub fn frame_count(&self) -> usize {
        self.frames
    }
}

impl Iterator for Playback {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.frames {
            return None;
        }
        if self.next > 0 {
            self.session.tick(self.dt);
        }
        let root = self
            .session
            .skeleton()
            .and_then(|s| s.world_position(s.root()))
            .unwrap_or_default();
        let frame = (self.next, self.session.time(), root);
        self.next += 1;
        Some(frame)
    }
}

/// Load the assets and prepare a run from the animation start
pub fn run(args: &PlayArgs) -> Result<Playback> {
    if args.fps <= 0.0 {
        bail!("fps must be positive, got {}", args.fps);
    }

    let mut session = Session::new(SessionConfig {
        playback: args.mode,
        strict_mapping: args.strict,
    });
    session.load(&args.skel)?;
    session.load(&args.anim)?;

    let duration = session.animation().map_or(0.0, |a| a.duration());
    let frames = args
        .frames
        .unwrap_or_else(|| (duration * args.fps).round() as usize + 1);

    Ok(Playback {
        session,
        dt: 1.0 / args.fps,
        next: 0,
        frames,
    })
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let playback = run(&args)?;
    log::info!(
        "Playing {} frames at {} fps ({} mode)",
        playback.frame_count(),
        args.fps,
        args.mode
    );

    let mut table = create_table(&["Frame", "Time", "Root X", "Root Y", "Root Z"]);
    for (frame, time, root) in playback {
        add_table_row(
            &mut table,
            [
                frame.to_string(),
                format!("{time:.4}"),
                format!("{:.5}", root.x),
                format!("{:.5}", root.y),
                format!("{:.5}", root.z),
            ],
        );
    }
    table.printstd();
    Ok(())
}
