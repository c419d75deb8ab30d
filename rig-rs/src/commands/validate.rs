//! Bulk asset validation

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::session::AssetKind;
use crate::utils::create_progress_bar;

/// Expand files and glob patterns into a sorted, de-duplicated list
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let literal = Path::new(pattern);
        if literal.is_file() {
            paths.push(literal.to_path_buf());
            continue;
        }
        let matches =
            glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
        for entry in matches {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable path: {}", e),
            }
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Parse one asset with the loader its extension selects
fn check(path: &Path) -> Result<AssetKind> {
    let kind = AssetKind::from_path(path)
        .with_context(|| format!("Unrecognised asset type: {}", path.display()))?;
    match kind {
        AssetKind::Skeleton => {
            rig_skel::Skeleton::load(path)?;
        }
        AssetKind::Animation => {
            rig_anim::Animation::load(path)?;
        }
        AssetKind::Skin => {
            rig_skin::Skin::load(path)?.validate()?;
        }
    }
    Ok(kind)
}

pub fn execute(patterns: &[String]) -> Result<()> {
    let paths = expand_patterns(patterns)?;
    if paths.is_empty() {
        bail!("No files matched {}", patterns.join(", "));
    }

    let pb = create_progress_bar(paths.len() as u64, "Validating assets");
    let mut failures = Vec::new();
    for path in &paths {
        pb.set_message(path.display().to_string());
        if let Err(e) = check(path) {
            failures.push((path, e));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for (path, error) in &failures {
        println!("✗ {}: {:#}", path.display(), error);
    }
    println!(
        "{} of {} files valid",
        paths.len() - failures.len(),
        paths.len()
    );

    if !failures.is_empty() {
        bail!("{} of {} files failed validation", failures.len(), paths.len());
    }
    Ok(())
}
