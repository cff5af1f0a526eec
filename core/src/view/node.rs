use serde::{Deserialize, Serialize};

/// Context action a tree surface offers on a country branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAction {
    Pin,
    Unpin,
}

/// One node of the rendered hierarchy. A node without children is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NodeAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
            children: Vec::new(),
        }
    }

    pub fn branch(label: impl Into<String>, children: Vec<DisplayNode>) -> Self {
        Self {
            label: label.into(),
            action: None,
            children,
        }
    }

    pub fn with_action(mut self, action: Option<NodeAction>) -> Self {
        self.action = action;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Branches start collapsed; leaves cannot be expanded.
    pub fn is_collapsible(&self) -> bool {
        !self.is_leaf()
    }

    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.label.as_str()).collect()
    }

    /// Depth of the subtree rooted here; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_serialize_without_children() {
        let json = serde_json::to_value(DisplayNode::leaf("Deaths: 3")).unwrap();
        assert_eq!(json, serde_json::json!({"label": "Deaths: 3"}));
    }

    #[test]
    fn depth_counts_levels_below() {
        let node = DisplayNode::branch(
            "Italy",
            vec![DisplayNode::branch("A", vec![DisplayNode::leaf("Confirmed: 1")])],
        );
        assert_eq!(node.depth(), 2);
        assert!(node.is_collapsible());
        assert!(!node.children[0].children[0].is_collapsible());
    }
}
