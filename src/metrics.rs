//! Rewrite statistics for a single compilation unit
//!
//! The dispatcher records what every rule did while a unit was rewritten. Statistics are
//! plain counters owned by the unit's dispatcher; nothing is shared between units.
//!
//! ## Metrics Tracked
//!
//! - Nodes dispatched (every node handed to the rule sequence)
//! - Per rule: nodes offered, nodes matched, nodes emitted
//! - Nodes deleted and nodes inserted by fan-out

use rustc_hash::FxHashMap;

/// Counters of one rule over one unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitorStats {
    /// Nodes passed to `wants`
    pub offered: usize,
    /// Nodes for which `wants` returned true
    pub matched: usize,
    /// Nodes returned by `visit`, summed over all matches
    pub emitted: usize,
}

/// Counters of one unit's rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformStats {
    nodes_dispatched: usize,
    nodes_deleted: usize,
    nodes_inserted: usize,
    visitors: FxHashMap<&'static str, VisitorStats>,
}

impl TransformStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a node entered the rule sequence
    pub fn record_dispatch(&mut self) {
        self.nodes_dispatched += 1;
    }

    /// Records that `visitor` was offered a node
    pub fn record_offer(&mut self, visitor: &'static str) {
        self.visitors.entry(visitor).or_default().offered += 1;
    }

    /// Records that `visitor` replaced one node with `emitted` nodes
    pub fn record_visit(&mut self, visitor: &'static str, emitted: usize) {
        let stats = self.visitors.entry(visitor).or_default();
        stats.matched += 1;
        stats.emitted += emitted;
        match emitted {
            0 => self.nodes_deleted += 1,
            1 => {}
            n => self.nodes_inserted += n - 1,
        }
    }

    pub fn nodes_dispatched(&self) -> usize {
        self.nodes_dispatched
    }

    /// Nodes removed by rules returning no replacement
    pub fn nodes_deleted(&self) -> usize {
        self.nodes_deleted
    }

    /// Extra nodes produced by rules returning more than one replacement
    pub fn nodes_inserted(&self) -> usize {
        self.nodes_inserted
    }

    /// Counters of the rule named `visitor`, if it was ever offered a node
    pub fn visitor(&self, visitor: &str) -> Option<VisitorStats> {
        self.visitors.get(visitor).copied()
    }

    /// Total number of `visit` calls across all rules
    pub fn total_matches(&self) -> usize {
        self.visitors.values().map(|stats| stats.matched).sum()
    }
}
