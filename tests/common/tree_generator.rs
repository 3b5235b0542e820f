//! Random reference trees for property-based testing.
//!
//! Generation uses a depth parameter to bound recursion, which keeps the trees small
//! enough for thousands of quickcheck iterations. The root is always a `SourceFile` so
//! a generated unit never starts out as something a rule might delete wholesale.

use std::sync::Arc;

use quickcheck::{Arbitrary, Gen};
use rewrite_pipeline::ir::{NodeKind, TreeNode};

const MAX_DEPTH: usize = 5;
const MAX_CHILDREN: usize = 4;
const NAMES: &[&str] = &["a", "b", "value", "result", "x"];
const STRINGS: &[&str] = &["Hello", "world", ""];
const NUMBERS: &[&str] = &["0", "1", "42"];

/// A randomly generated source file
#[derive(Clone, Debug)]
pub struct ArbitraryTree(pub Arc<TreeNode>);

impl Arbitrary for ArbitraryTree {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = g.size().min(MAX_DEPTH);
        let statements = gen_children(g, depth);
        ArbitraryTree(TreeNode::source_file(statements))
    }
}

fn gen_children(g: &mut Gen, depth: usize) -> Vec<Arc<TreeNode>> {
    let count = usize::arbitrary(g) % (MAX_CHILDREN + 1);
    (0..count).map(|_| gen_node(g, depth.saturating_sub(1))).collect()
}

fn gen_leaf(g: &mut Gen) -> Arc<TreeNode> {
    match u8::arbitrary(g) % 3 {
        0 => TreeNode::identifier(*g.choose(NAMES).unwrap()),
        1 => TreeNode::string_literal(*g.choose(STRINGS).unwrap()),
        _ => TreeNode::numeric_literal(*g.choose(NUMBERS).unwrap()),
    }
}

fn gen_node(g: &mut Gen, depth: usize) -> Arc<TreeNode> {
    if depth == 0 {
        return gen_leaf(g);
    }
    const KINDS: &[NodeKind] = &[
        NodeKind::VariableStatement,
        NodeKind::VariableDeclaration,
        NodeKind::ExportAssignment,
        NodeKind::Block,
        NodeKind::CallExpression,
        NodeKind::ExpressionStatement,
        NodeKind::Identifier,
        NodeKind::StringLiteral,
        NodeKind::NumericLiteral,
    ];
    match *g.choose(KINDS).unwrap() {
        NodeKind::VariableStatement => {
            let count = 1 + usize::arbitrary(g) % 2;
            let declarations = (0..count)
                .map(|_| {
                    TreeNode::variable_declaration(*g.choose(NAMES).unwrap(), gen_node(g, depth - 1))
                })
                .collect();
            TreeNode::variable_statement(declarations)
        }
        NodeKind::VariableDeclaration => {
            TreeNode::variable_declaration(*g.choose(NAMES).unwrap(), gen_node(g, depth - 1))
        }
        NodeKind::ExportAssignment => TreeNode::export_assignment(gen_node(g, depth - 1)),
        NodeKind::Block => TreeNode::block(gen_children(g, depth)),
        NodeKind::CallExpression => {
            TreeNode::call_expression(TreeNode::identifier(*g.choose(NAMES).unwrap()), gen_children(g, depth))
        }
        NodeKind::ExpressionStatement => TreeNode::expression_statement(gen_node(g, depth - 1)),
        _ => gen_leaf(g),
    }
}

/// Counts nodes of `kind` in the subtree rooted at `node`
pub fn count_kind(node: &TreeNode, kind: NodeKind) -> usize {
    let own = usize::from(node.node_kind() == kind);
    own + node
        .child_nodes()
        .iter()
        .map(|child| count_kind(child, kind))
        .sum::<usize>()
}
