//! Animation file command implementations

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use rig_anim::Animation;
use std::path::{Path, PathBuf};

use crate::utils::{add_table_row, create_table, format_seconds, property_table};

#[derive(Subcommand)]
pub enum AnimCommands {
    /// Display information about an animation file
    Info {
        /// Path to the .anim file
        file: PathBuf,
    },

    /// Print the values of one channel over time
    Sample {
        /// Path to the .anim file
        file: PathBuf,

        /// Channel index
        #[arg(short, long)]
        channel: usize,

        /// First sample time (defaults to the range start)
        #[arg(long, allow_negative_numbers = true)]
        from: Option<f32>,

        /// Last sample time (defaults to the range end)
        #[arg(long, allow_negative_numbers = true)]
        to: Option<f32>,

        /// Seconds between samples
        #[arg(long, default_value_t = 0.1)]
        step: f32,

        /// Also print the slope at each sample
        #[arg(long)]
        slope: bool,
    },
}

pub fn execute(cmd: AnimCommands) -> Result<()> {
    match cmd {
        AnimCommands::Info { file } => handle_info(&file),
        AnimCommands::Sample {
            file,
            channel,
            from,
            to,
            step,
            slope,
        } => handle_sample(&file, channel, from, to, step, slope),
    }
}

pub(crate) fn load_animation(path: &Path) -> Result<Animation> {
    Animation::load(path)
        .with_context(|| format!("Failed to load animation from {}", path.display()))
}

/// What a channel drives under the positional layout
fn channel_role(index: usize) -> String {
    const AXES: [&str; 3] = ["x", "y", "z"];
    match index {
        0..=2 => format!("root t{}", AXES[index]),
        _ => format!("joint {} r{}", (index - 3) / 3, AXES[(index - 3) % 3]),
    }
}

fn handle_info(path: &Path) -> Result<()> {
    let animation = load_animation(path)?;
    let keys: usize = animation
        .channels()
        .iter()
        .map(|c| c.keyframes().len())
        .sum();
    let animated_joints = animation.channel_count().saturating_sub(3) / 3;

    println!("=== Animation: {} ===\n", path.display());
    property_table(&[
        (
            "Range",
            format!(
                "{} .. {}",
                format_seconds(animation.start()),
                format_seconds(animation.end())
            ),
        ),
        ("Duration", format_seconds(animation.duration())),
        ("Channels", animation.channel_count().to_string()),
        ("Animated joints", animated_joints.to_string()),
        ("Keyframes", keys.to_string()),
    ])
    .printstd();

    println!();
    let mut table = create_table(&["#", "Drives", "Keys", "In", "Out", "Key range"]);
    for (index, channel) in animation.channels().iter().enumerate() {
        let range = channel.time_range().map_or_else(
            || "-".to_string(),
            |(first, last)| format!("{first} .. {last}"),
        );
        add_table_row(
            &mut table,
            [
                index.to_string(),
                channel_role(index),
                channel.keyframes().len().to_string(),
                channel.extrapolate_in().to_string(),
                channel.extrapolate_out().to_string(),
                range,
            ],
        );
    }
    table.printstd();

    Ok(())
}

fn handle_sample(
    path: &Path,
    channel: usize,
    from: Option<f32>,
    to: Option<f32>,
    step: f32,
    show_slope: bool,
) -> Result<()> {
    let animation = load_animation(path)?;
    let Some(curve) = animation.channel(channel) else {
        bail!(
            "Channel {} out of range (animation has {} channels)",
            channel,
            animation.channel_count()
        );
    };
    if step <= 0.0 {
        bail!("Step must be positive, got {}", step);
    }

    let from = from.unwrap_or(animation.start());
    let to = to.unwrap_or(animation.end());

    let headers: &[&str] = if show_slope {
        &["Time", "Value", "Slope"]
    } else {
        &["Time", "Value"]
    };
    let mut table = create_table(headers);
    for (time, value) in animation.sample(channel, from, to, step) {
        let mut row = vec![format!("{time:.4}"), format!("{value:.6}")];
        if show_slope {
            row.push(format!("{:.6}", curve.evaluate_slope(time)));
        }
        add_table_row(&mut table, row);
    }
    table.printstd();

    Ok(())
}
