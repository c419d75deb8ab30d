//! Main entry point for the rig CLI

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use rig_rs::cli::{Cli, Commands};
use rig_rs::commands;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.verbose > 0 {
        log::set_max_level(match cli.verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if cli.quiet {
        log::set_max_level(log::LevelFilter::Error);
    }

    match cli.command {
        Commands::Skel { command } => commands::skel::execute(command),
        Commands::Anim { command } => commands::anim::execute(command),
        Commands::Skin { command } => commands::skin::execute(command),
        Commands::Pose {
            skel,
            anim,
            skin,
            time,
            edits,
            json,
        } => commands::pose::execute(commands::pose::PoseArgs {
            skel,
            anim,
            skin,
            time,
            edits,
            json,
        }),
        Commands::Play {
            skel,
            anim,
            fps,
            frames,
            mode,
            strict,
        } => commands::play::execute(commands::play::PlayArgs {
            skel,
            anim,
            fps,
            frames,
            mode,
            strict,
        }),
        Commands::Validate { patterns } => commands::validate::execute(&patterns),
        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
