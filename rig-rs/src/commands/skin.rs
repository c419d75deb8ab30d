//! Skin file command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use rig_skin::Skin;
use std::path::{Path, PathBuf};

use crate::commands::skel::load_skeleton;
use crate::utils::{format_bytes, property_table};

#[derive(Subcommand)]
pub enum SkinCommands {
    /// Display information about a skin file
    Info {
        /// Path to the .skin file
        file: PathBuf,
    },

    /// Check triangle and joint indices
    Validate {
        /// Path to the .skin file
        file: PathBuf,

        /// Also check the bindings against this skeleton
        #[arg(long)]
        skel: Option<PathBuf>,
    },
}

pub fn execute(cmd: SkinCommands) -> Result<()> {
    match cmd {
        SkinCommands::Info { file } => handle_info(&file),
        SkinCommands::Validate { file, skel } => handle_validate(&file, skel.as_deref()),
    }
}

pub(crate) fn load_skin(path: &Path) -> Result<Skin> {
    Skin::load(path).with_context(|| format!("Failed to load skin from {}", path.display()))
}

fn handle_info(path: &Path) -> Result<()> {
    let skin = load_skin(path)?;
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or_default();

    let weighted = skin.weights().iter().filter(|w| !w.is_empty()).count();
    let max_influences = skin
        .weights()
        .iter()
        .map(|w| w.attachments().len())
        .max()
        .unwrap_or_default();

    println!("=== Skin: {} ===\n", path.display());
    property_table(&[
        ("File size", format_bytes(size)),
        ("Vertices", skin.vertex_count().to_string()),
        ("Normals", skin.normals().len().to_string()),
        ("Triangles", skin.triangle_count().to_string()),
        ("Bindings", skin.bindings().len().to_string()),
        (
            "Weighted vertices",
            format!("{} / {}", weighted, skin.vertex_count()),
        ),
        ("Max influences", max_influences.to_string()),
    ])
    .printstd();

    Ok(())
}

fn handle_validate(path: &Path, skel: Option<&Path>) -> Result<()> {
    let skin = load_skin(path)?;

    match skel {
        Some(skel_path) => {
            let skeleton = load_skeleton(skel_path)?;
            skin.validate_for(&skeleton)
                .with_context(|| format!("{} does not fit {}", path.display(), skel_path.display()))?;
        }
        None => skin
            .validate()
            .with_context(|| format!("{} failed validation", path.display()))?,
    }

    println!("✓ {} is valid", path.display());
    Ok(())
}
