//! Ordered, composable node-visitor pipelines for rewriting syntax trees.
//!
//! A [`Pipeline`](ir::pipeline::Pipeline) binds a context type to an ordered list of rule
//! types. It is instantiated once per configuration and then rewrites compilation units
//! one at a time: every unit gets the context re-initialized, a fresh instance of every
//! rule, and a depth-first rewrite in which each rule may delete, replace, or fan out the
//! nodes it matches.

pub mod config;
pub mod ir;
pub mod logging;
pub mod metrics;
