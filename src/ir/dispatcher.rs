//! Composite dispatcher applying an ordered list of rules to a tree
//!
//! Each call to [`CompositeVisitor::visit_node`] runs in two phases:
//!
//! 1. The input node is placed in a working list and every rule, in pipeline order,
//!    rewrites the whole list: nodes it wants are spliced out for whatever `visit`
//!    returns, the others pass through. Later rules therefore see the output of
//!    earlier ones at the same level.
//! 2. Every node left in the list has its children dispatched independently with the
//!    same procedure, and is rebuilt around the flattened results.
//!
//! Only the original input node goes through phase 1 at a given level. Siblings
//! introduced by a rule are not re-run through the rules at that level; their children
//! are dispatched in phase 2 like any other surviving node.

use std::sync::Arc;

use tracing::trace;

use super::semantic_node::SemanticNode;
use super::visitor::NamedVisitor;
use crate::metrics::TransformStats;

/// Applies a fixed sequence of rule instances recursively to a tree
pub struct CompositeVisitor<N: SemanticNode> {
    visitors: Vec<NamedVisitor<N>>,
    stats: TransformStats,
}

impl<N: SemanticNode> CompositeVisitor<N> {
    /// Creates a dispatcher over `visitors`, applied in the given order
    pub fn new(visitors: Vec<NamedVisitor<N>>) -> Self {
        Self {
            visitors,
            stats: TransformStats::new(),
        }
    }

    /// Statistics accumulated since this dispatcher was created
    pub fn stats(&self) -> &TransformStats {
        &self.stats
    }

    /// Consumes the dispatcher, returning its statistics
    pub fn into_stats(self) -> TransformStats {
        self.stats
    }

    /// Rewrites the subtree rooted at `node`
    ///
    /// # Returns
    /// The nodes replacing `node` in its parent: empty if it was deleted, one node for
    /// a one-for-one replacement, several nodes for a fan-out.
    ///
    /// # Errors
    /// The first error returned by a rule is propagated unchanged; the rewrite of the
    /// whole subtree is abandoned.
    pub fn visit_node(&mut self, node: Arc<N>) -> anyhow::Result<Vec<Arc<N>>> {
        self.stats.record_dispatch();

        let mut nodes = vec![node];
        for index in 0..self.visitors.len() {
            nodes = self.apply_visitor(index, nodes)?;
        }

        nodes
            .into_iter()
            .map(|node| self.visit_each_child(node))
            .collect()
    }

    /// Runs one rule over the working list, preserving order
    fn apply_visitor(&mut self, index: usize, nodes: Vec<Arc<N>>) -> anyhow::Result<Vec<Arc<N>>> {
        let name = self.visitors[index].name;
        let visitor = &mut self.visitors[index].visitor;
        let mut next_nodes = Vec::with_capacity(nodes.len());

        for node in nodes {
            self.stats.record_offer(name);
            if visitor.wants(&node) {
                let replacements = visitor.visit(node)?;
                trace!(
                    "Visitor {} replaced a node with {} node(s)",
                    name,
                    replacements.len()
                );
                self.stats.record_visit(name, replacements.len());
                next_nodes.extend(replacements);
            } else {
                next_nodes.push(node);
            }
        }

        Ok(next_nodes)
    }

    /// Dispatches every child of `node` and rebuilds it around the results
    ///
    /// `node` itself is returned when every child came back as the very same `Arc`.
    fn visit_each_child(&mut self, node: Arc<N>) -> anyhow::Result<Arc<N>> {
        let children = node.children();
        if children.is_empty() {
            return Ok(node);
        }

        let mut changed = false;
        let mut new_children = Vec::with_capacity(children.len());
        for child in children {
            let rewritten = self.visit_node(Arc::clone(&child))?;
            if !matches!(rewritten.as_slice(), [only] if Arc::ptr_eq(only, &child)) {
                changed = true;
            }
            new_children.extend(rewritten);
        }

        if changed {
            Ok(Arc::new(node.with_children(new_children)))
        } else {
            Ok(node)
        }
    }
}
