use covidcore::map::MapMarker;
use covidcore::view::{DisplayNode, NodeAction};

/// Indented text rendering of a display tree, one node per line.
pub fn render_tree(nodes: &[DisplayNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, 0, &mut out);
    }
    out
}

fn render_node(node: &DisplayNode, depth: usize, out: &mut String) {
    let marker = if node.is_collapsible() { "+" } else { "-" };
    out.push_str(&"  ".repeat(depth));
    out.push_str(marker);
    out.push(' ');
    out.push_str(&node.label);
    match node.action {
        Some(NodeAction::Pin) => out.push_str("  [pin]"),
        Some(NodeAction::Unpin) => out.push_str("  [unpin]"),
        None => {}
    }
    out.push('\n');
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}

pub fn render_marker(marker: &MapMarker) -> String {
    let place = if marker.province.is_empty() {
        marker.country.clone()
    } else {
        format!("{}, {}", marker.country, marker.province)
    };
    format!(
        "{place} @ ({:.4}, {:.4}) radius {} m {}",
        marker.latitude, marker.longitude, marker.radius, marker.color
    )
}
