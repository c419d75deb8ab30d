//! Root CLI structure for rig

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::clock::PlaybackMode;
use crate::commands::pose::DofEdit;

#[derive(Parser)]
#[command(name = "rig")]
#[command(about = "Command-line tools for skeletons, skins and keyframe animations", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Skeleton (.skel) operations
    Skel {
        #[command(subcommand)]
        command: crate::commands::skel::SkelCommands,
    },

    /// Animation (.anim) operations
    Anim {
        #[command(subcommand)]
        command: crate::commands::anim::AnimCommands,
    },

    /// Skin (.skin) operations
    Skin {
        #[command(subcommand)]
        command: crate::commands::skin::SkinCommands,
    },

    /// Evaluate a single frame and print joint world positions
    Pose {
        /// Skeleton file
        #[arg(long)]
        skel: PathBuf,

        /// Animation to evaluate
        #[arg(long)]
        anim: Option<PathBuf>,

        /// Skin to update with the posed skeleton
        #[arg(long)]
        skin: Option<PathBuf>,

        /// Time to evaluate the animation at
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        time: f32,

        /// Override a DOF after the animation, as `index:dof=value` (e.g. `2:z=0.5`)
        #[arg(long = "set", value_name = "EDIT")]
        edits: Vec<DofEdit>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Step an animation and print the root position per frame
    Play {
        /// Skeleton file
        #[arg(long)]
        skel: PathBuf,

        /// Animation file
        #[arg(long)]
        anim: PathBuf,

        /// Frames per second
        #[arg(long, default_value_t = 30.0)]
        fps: f32,

        /// Number of frames (defaults to one pass over the animation range)
        #[arg(long)]
        frames: Option<usize>,

        /// Time handling at the ends of the range
        #[arg(long, value_enum, default_value_t = PlaybackMode::Free)]
        mode: PlaybackMode,

        /// Fail if the channel count does not match the skeleton
        #[arg(long)]
        strict: bool,
    },

    /// Load every asset matching the given patterns and report failures
    Validate {
        /// Files or glob patterns (e.g. `assets/**/*.skel`)
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
