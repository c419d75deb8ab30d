//! Tree rendering for joint hierarchies

use console::Style;

/// Kinds of node in a rendered tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// The file itself
    File,
    /// A joint with children
    Joint,
    /// A joint without children
    EndEffector,
}

impl NodeType {
    /// Icon shown before the node name
    pub fn icon(self) -> &'static str {
        match self {
            NodeType::File => "📄",
            NodeType::Joint => "🦴",
            NodeType::EndEffector => "•",
        }
    }

    /// Color style for the node name
    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            return Style::new();
        }
        match self {
            NodeType::File => Style::new().bold().cyan(),
            NodeType::Joint => Style::new().green(),
            NodeType::EndEffector => Style::new().yellow(),
        }
    }
}

/// A node in a rendered tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    /// Extra lines printed under the node (offset, limits, ...)
    pub details: Vec<(String, String)>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            details: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a detail line
    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.push((key.to_string(), value.into()));
        self
    }
}

/// Options for tree rendering
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_details: bool,
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };
    let style = node.node_type.style(options.no_color);
    output.push_str(&format!(
        "{}{}{} {}\n",
        prefix,
        connector,
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));

    let child_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "    " } else { "│   " })
    };

    if options.show_details {
        let detail_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        let rail = if node.children.is_empty() { "  " } else { "│ " };
        for (key, value) in &node.details {
            output.push_str(&format!(
                "{}{} {}: {}\n",
                child_prefix,
                rail,
                detail_style.apply_to(key),
                value
            ));
        }
    }

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(
            child,
            output,
            &child_prefix,
            is_last_child,
            depth + 1,
            options,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm() -> TreeNode {
        TreeNode::new("arm.skel", NodeType::File).add_child(
            TreeNode::new("shoulder", NodeType::Joint)
                .with_detail("offset", "(0, 1.5, 0)")
                .add_child(TreeNode::new("elbow", NodeType::Joint).add_child(
                    TreeNode::new("wrist", NodeType::EndEffector),
                ))
                .add_child(TreeNode::new("clavicle", NodeType::EndEffector)),
        )
    }

    #[test]
    fn test_tree_rendering() {
        let options = TreeOptions {
            no_color: true,
            show_details: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&arm(), &options);

        assert!(output.contains("├── 🦴 elbow"));
        assert!(output.contains("└── • clavicle"));
        assert!(output.contains("offset: (0, 1.5, 0)"));
    }

    #[test]
    fn test_max_depth() {
        let options = TreeOptions {
            max_depth: Some(2),
            no_color: true,
            show_details: false,
        };
        let output = render_tree(&arm(), &options);
        assert!(output.contains("elbow"));
        assert!(!output.contains("wrist"));
        assert!(!output.contains("offset"));
    }
}
