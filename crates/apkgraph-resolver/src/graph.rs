use crate::types::ClosureResult;

pub const GRAPH_HEADER: &str = "graph\n";

/// Renders a closure as a mermaid flowchart description.
///
/// A closure without edges renders as the header followed by the bare
/// package name, with no trailing newline.
pub fn serialize(start: &str, closure: &ClosureResult) -> String {
    if closure.is_leaf() {
        return format!("{GRAPH_HEADER}{start}");
    }

    let mut out = String::from(GRAPH_HEADER);
    for edge in &closure.edges {
        out.push_str(&edge.from);
        out.push_str(" --> ");
        out.push_str(&edge.to);
        out.push('\n');
    }
    out
}
