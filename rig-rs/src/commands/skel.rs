//! Skeleton file command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use rig_skel::{Dof, JointId, Skeleton};
use std::path::{Path, PathBuf};

use crate::utils::{
    NodeType, TreeNode, TreeOptions, add_table_row, create_table, format_vec3, property_table,
    render_tree,
};

#[derive(Subcommand)]
pub enum SkelCommands {
    /// Display information about a skeleton file
    Info {
        /// Path to the .skel file
        file: PathBuf,
    },

    /// Display the joint hierarchy as a tree
    Tree {
        /// Path to the .skel file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Show offsets and rotation limits under each joint
        #[arg(short = 'D', long)]
        details: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

pub fn execute(cmd: SkelCommands) -> Result<()> {
    match cmd {
        SkelCommands::Info { file } => handle_info(&file),
        SkelCommands::Tree {
            file,
            depth,
            details,
            no_color,
        } => handle_tree(&file, depth, details, no_color),
    }
}

pub(crate) fn load_skeleton(path: &Path) -> Result<Skeleton> {
    Skeleton::load(path)
        .with_context(|| format!("Failed to load skeleton from {}", path.display()))
}

fn handle_info(path: &Path) -> Result<()> {
    let mut skeleton = load_skeleton(path)?;
    skeleton.update();

    let max_depth = skeleton
        .joint_list()
        .iter()
        .map(|&id| skeleton.depth(id))
        .max()
        .unwrap_or_default();
    let root_name = skeleton
        .joint(skeleton.root())
        .map(|j| j.name().to_string())
        .unwrap_or_default();

    println!("=== Skeleton: {} ===\n", path.display());
    property_table(&[
        ("Joints", skeleton.joint_count().to_string()),
        ("Root", root_name),
        ("Depth", max_depth.to_string()),
        (
            "Animation channels",
            rig_anim::expected_channels(skeleton.joint_count()).to_string(),
        ),
    ])
    .printstd();

    println!();
    let mut table = create_table(&["#", "Joint", "Parent", "Offset", "World position"]);
    for (index, joint) in skeleton.joints().enumerate() {
        let parent = joint
            .parent()
            .and_then(|p| skeleton.joint(p))
            .map_or("-", |p| p.name());
        add_table_row(
            &mut table,
            [
                index.to_string(),
                joint.name().to_string(),
                parent.to_string(),
                format_vec3(joint.offset()),
                format_vec3(joint.world_position()),
            ],
        );
    }
    table.printstd();

    Ok(())
}

fn joint_node(skeleton: &Skeleton, id: JointId) -> Option<TreeNode> {
    let joint = skeleton.joint(id)?;
    let children = skeleton.children(id);
    let node_type = if children.is_empty() {
        NodeType::EndEffector
    } else {
        NodeType::Joint
    };

    let mut node = TreeNode::new(joint.name(), node_type)
        .with_detail("offset", format_vec3(joint.offset()));
    for dof in Dof::ALL {
        let limit = joint.limit(dof);
        node = node.with_detail(dof.label(), format!("[{:.3}, {:.3}]", limit.min, limit.max));
    }

    Some(
        children
            .iter()
            .filter_map(|&child| joint_node(skeleton, child))
            .fold(node, TreeNode::add_child),
    )
}

fn handle_tree(path: &Path, depth: Option<usize>, details: bool, no_color: bool) -> Result<()> {
    let skeleton = load_skeleton(path)?;

    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mut root = TreeNode::new(file_name, NodeType::File)
        .with_detail("joints", skeleton.joint_count().to_string());
    if let Some(node) = joint_node(&skeleton, skeleton.root()) {
        root = root.add_child(node);
    }

    let options = TreeOptions {
        max_depth: depth,
        no_color,
        show_details: details,
    };
    print!("{}", render_tree(&root, &options));
    Ok(())
}
