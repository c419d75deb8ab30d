//! Single-frame evaluation

use anyhow::{Context, Result, bail};
use glam::Vec3;
use rig_skel::Dof;
use std::path::PathBuf;
use std::str::FromStr;

use crate::session::{Session, SessionConfig};
use crate::utils::{add_table_row, create_table, format_angle, format_vec3};

/// A manual DOF override, written `index:dof=value`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DofEdit {
    /// Joint position in the traversal list
    pub index: usize,
    pub dof: Dof,
    pub value: f32,
}

impl FromStr for DofEdit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (index, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected index:dof=value, got '{s}'"))?;
        let (dof, value) = rest
            .split_once('=')
            .ok_or_else(|| format!("expected index:dof=value, got '{s}'"))?;

        Ok(Self {
            index: index
                .trim()
                .parse()
                .map_err(|_| format!("invalid joint index '{index}'"))?,
            dof: Dof::from_name(dof.trim()).ok_or_else(|| format!("invalid dof '{dof}'"))?,
            value: value
                .trim()
                .parse()
                .map_err(|_| format!("invalid value '{value}'"))?,
        })
    }
}

/// Arguments of `rig pose`
#[derive(Debug, Clone)]
pub struct PoseArgs {
    pub skel: PathBuf,
    pub anim: Option<PathBuf>,
    pub skin: Option<PathBuf>,
    pub time: f32,
    pub edits: Vec<DofEdit>,
    pub json: bool,
}

/// One row of the pose report
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct JointReport {
    pub index: usize,
    pub name: String,
    pub pose: Vec3,
    pub clamped_pose: Vec3,
    pub world_position: Vec3,
}

/// Everything `rig pose` prints
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoseReport {
    pub time: f32,
    pub joints: Vec<JointReport>,
    pub skinning_matrices: Option<Vec<[f32; 16]>>,
}

/// Load the assets, evaluate one frame at `args.time`, apply the edits and
/// collect the result
pub fn evaluate(args: &PoseArgs) -> Result<PoseReport> {
    let mut session = Session::new(SessionConfig::default());
    session.load(&args.skel)?;
    if let Some(anim) = &args.anim {
        session.load(anim)?;
    }
    if let Some(skin) = &args.skin {
        session.load(skin)?;
    }

    // Evaluate exactly at the requested time, then let edits override
    session.clock_mut().seek(args.time, None);
    session.apply_animation();
    for edit in &args.edits {
        session
            .set_dof(edit.index, edit.dof, edit.value)
            .with_context(|| format!("Cannot apply --set {}:{:?}", edit.index, edit.dof))?;
    }
    session.update_hierarchy();

    let Some(skeleton) = session.skeleton() else {
        bail!("No skeleton loaded");
    };
    let joints = skeleton
        .joints()
        .enumerate()
        .map(|(index, joint)| JointReport {
            index,
            name: joint.name().to_string(),
            pose: joint.pose(),
            clamped_pose: joint.clamped_pose(),
            world_position: joint.world_position(),
        })
        .collect();
    let skinning_matrices = session.skin().map(|skin| {
        skin.skinning_matrices()
            .iter()
            .map(|m| m.to_cols_array())
            .collect()
    });

    Ok(PoseReport {
        time: session.time(),
        joints,
        skinning_matrices,
    })
}

pub fn execute(args: PoseArgs) -> Result<()> {
    let report = evaluate(&args)?;

    if args.json {
        return print_json(&report);
    }

    println!("=== Pose at t = {} ===\n", report.time);
    let mut table = create_table(&["#", "Joint", "Rotate X", "Rotate Y", "Rotate Z", "World position"]);
    for joint in &report.joints {
        add_table_row(
            &mut table,
            [
                joint.index.to_string(),
                joint.name.clone(),
                format_angle(joint.clamped_pose.x),
                format_angle(joint.clamped_pose.y),
                format_angle(joint.clamped_pose.z),
                format_vec3(joint.world_position),
            ],
        );
    }
    table.printstd();

    if let Some(matrices) = &report.skinning_matrices {
        println!("\n=== Skinning matrices ===");
        for (i, m) in matrices.iter().enumerate() {
            println!("[{i}]");
            // column-major storage, printed as rows
            for row in 0..4 {
                println!(
                    "  {:>10.5} {:>10.5} {:>10.5} {:>10.5}",
                    m[row],
                    m[4 + row],
                    m[8 + row],
                    m[12 + row]
                );
            }
        }
    }

    Ok(())
}

#[cfg(feature = "serde")]
fn print_json(report: &PoseReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_json(_report: &PoseReport) -> Result<()> {
    bail!("JSON output requires the 'serde' feature")
}
