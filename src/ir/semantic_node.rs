/// Host tree capability consumed by the rewrite engine
///
/// The engine never builds nodes on its own. It only decides which nodes replace which,
/// so everything it needs from a tree is captured by the `SemanticNode` trait below:
/// a kind tag for rules to match on, ordered children, and a way to rebuild a node
/// around a new child list.
///
/// Design principles:
/// - Immutable: nodes are shared through `Arc` and replaced, never mutated in place
/// - Structural: equality is whatever the host's `PartialEq` says
/// - Kind-tagged: rules select nodes by a cheap `Copy` tag instead of downcasting

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Core trait every host tree node implements to be rewritten by a pipeline
///
/// # Design
/// - Type discrimination: `Kind` lets rules pattern match without downcasting
/// - Traversal: `children` yields the ordered child list
/// - Reconstruction: `with_children` produces the structurally updated node
///
/// Implementations must keep `children` and `with_children` consistent: for any node,
/// `node.with_children(node.children())` is equal to `node`.
pub trait SemanticNode: fmt::Debug + Sized {
    /// Discriminator for the node shapes a tree can contain
    type Kind: Copy + Eq + Hash + fmt::Debug;

    /// Returns the discriminator for this node
    fn kind(&self) -> Self::Kind;

    /// Returns the child nodes of this node, in source order
    ///
    /// Returns an empty vector for leaves (e.g., literals).
    fn children(&self) -> Vec<Arc<Self>>;

    /// Returns a copy of this node whose children are replaced by `children`
    ///
    /// The new list may be shorter or longer than the current one when a rule
    /// deleted or fanned out a child.
    fn with_children(&self, children: Vec<Arc<Self>>) -> Self;

    /// Returns true if this node has no children
    fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }
}

/// Counts every node in the subtree rooted at `node`, `node` included
pub fn subtree_size<N: SemanticNode>(node: &N) -> usize {
    1 + node
        .children()
        .iter()
        .map(|child| subtree_size(child.as_ref()))
        .sum::<usize>()
}

/// Returns the depth of the subtree rooted at `node` (a leaf has depth 1)
pub fn subtree_depth<N: SemanticNode>(node: &N) -> usize {
    1 + node
        .children()
        .iter()
        .map(|child| subtree_depth(child.as_ref()))
        .max()
        .unwrap_or(0)
}
