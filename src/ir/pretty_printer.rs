use serde_json::{json, Value};
use tracing::trace;

use super::tree_node::TreeNode;

/// Formats a reference tree as an S-expression.
///
/// Leaves print as `(Kind "text")`, branches as `(Kind child...)`. With `pretty_print`
/// every child goes on its own line, indented by two spaces per level.
pub fn format(tree: &TreeNode, pretty_print: bool) -> String {
    let mut result = String::new();
    write_node(&mut result, tree, 0, pretty_print);
    trace!("Formatted tree (pretty_print={}): {}", pretty_print, result);
    result
}

fn write_node(out: &mut String, node: &TreeNode, depth: usize, pretty_print: bool) {
    out.push_str(&format!("({}", node.node_kind()));
    if let Some(text) = node.text() {
        out.push_str(&format!(" {text:?}"));
    }
    for child in node.child_nodes() {
        if pretty_print {
            out.push('\n');
            out.push_str(&"  ".repeat(depth + 1));
        } else {
            out.push(' ');
        }
        write_node(out, child, depth + 1, pretty_print);
    }
    out.push(')');
}

/// Converts a reference tree into a JSON value
///
/// Every node becomes `{"kind": ..., "text": ..., "children": [...]}`; `text` is omitted
/// on nodes without text and `children` on leaves.
pub fn to_json(tree: &TreeNode) -> Value {
    let mut object = json!({ "kind": tree.node_kind().to_string() });
    if let Some(text) = tree.text() {
        object["text"] = Value::String(text.to_string());
    }
    if !tree.child_nodes().is_empty() {
        object["children"] = Value::Array(tree.child_nodes().iter().map(|c| to_json(c)).collect());
    }
    object
}
