//! Node visitor contract
//!
//! A pipeline is made of two kinds of pluggable pieces:
//!
//! - a [`NodeVisitorContext`], one instance per pipeline instantiation, initialized again
//!   for every compilation unit and shared by all rules of that unit;
//! - any number of [`NodeVisitor`] rules, freshly constructed for every unit from the
//!   shared context.
//!
//! # Usage
//!
//! ```ignore
//! struct DeleteExport;
//!
//! impl NodeVisitor<TreeNode> for DeleteExport {
//!     fn wants(&self, node: &TreeNode) -> bool {
//!         node.kind() == NodeKind::ExportAssignment
//!     }
//!
//!     fn visit(&mut self, _node: Arc<TreeNode>) -> anyhow::Result<Vec<Arc<TreeNode>>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! impl VisitorFactory<MyContext> for DeleteExport {
//!     fn new(_context: SharedContext<MyContext>) -> Self {
//!         DeleteExport
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::semantic_node::SemanticNode;

/// Handle through which every rule of a unit reaches the unit's context
pub type SharedContext<C> = Arc<Mutex<C>>;

/// A rewrite rule applied to the nodes of a tree
///
/// `visit` is only ever called on nodes for which `wants` returned true. The returned
/// nodes replace the visited one in place: an empty vector deletes it, a single node
/// replaces it, several nodes fan out into its position in order.
pub trait NodeVisitor<N: SemanticNode> {
    /// Indicates if the rule wants to visit this node
    fn wants(&self, node: &N) -> bool;

    /// Visits a node accepted by `wants` and returns its replacements
    fn visit(&mut self, node: Arc<N>) -> anyhow::Result<Vec<Arc<N>>>;
}

/// Constructor of a rule type
///
/// The pipeline calls `new` once per compilation unit, so any state a rule keeps in its
/// own fields lives exactly as long as one unit's transform.
pub trait VisitorFactory<C: NodeVisitorContext>: NodeVisitor<C::Node> + Sized + 'static {
    fn new(context: SharedContext<C>) -> Self;
}

/// State shared by all rules while a compilation unit is rewritten
pub trait NodeVisitorContext: Sized + 'static {
    /// Tree the rules operate on
    type Node: SemanticNode;
    /// Compilation-wide services handed over when the pipeline is instantiated
    type Program: ?Sized;
    /// Unit-scoped services (node factory, diagnostics sink, ...) handed over per unit
    type Services;

    /// Creates the context from the compilation-wide services and the user configuration
    fn new(program: &Self::Program, configuration: &Value) -> anyhow::Result<Self>;

    /// Prepares the context for a new compilation unit
    ///
    /// Called exactly once per unit, before any rule of that unit is constructed.
    fn init_new_file(&mut self, services: Self::Services, root: &Arc<Self::Node>) -> anyhow::Result<()>;
}

type Constructor<C> =
    fn(SharedContext<C>) -> Box<dyn NodeVisitor<<C as NodeVisitorContext>::Node>>;

/// A rule type registered in a pipeline: its name and how to construct it
pub struct VisitorType<C: NodeVisitorContext> {
    name: &'static str,
    construct: Constructor<C>,
}

impl<C: NodeVisitorContext> VisitorType<C> {
    /// Registers the rule type `V`
    pub fn of<V: VisitorFactory<C>>() -> Self {
        VisitorType {
            name: std::any::type_name::<V>(),
            construct: construct::<C, V>,
        }
    }

    /// Fully qualified name of the rule type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a fresh rule instance bound to `context`
    pub fn instantiate(&self, context: &SharedContext<C>) -> Box<dyn NodeVisitor<C::Node>> {
        (self.construct)(Arc::clone(context))
    }
}

fn construct<C, V>(context: SharedContext<C>) -> Box<dyn NodeVisitor<C::Node>>
where
    C: NodeVisitorContext,
    V: VisitorFactory<C>,
{
    Box::new(<V as VisitorFactory<C>>::new(context))
}

impl<C: NodeVisitorContext> Clone for VisitorType<C> {
    fn clone(&self) -> Self {
        VisitorType {
            name: self.name,
            construct: self.construct,
        }
    }
}

impl<C: NodeVisitorContext> fmt::Debug for VisitorType<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VisitorType").field(&self.name).finish()
    }
}

/// A rule instance together with the name it is logged and counted under
pub struct NamedVisitor<N: SemanticNode> {
    pub name: &'static str,
    pub visitor: Box<dyn NodeVisitor<N>>,
}

impl<N: SemanticNode> fmt::Debug for NamedVisitor<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedVisitor").field("name", &self.name).finish_non_exhaustive()
    }
}
