pub mod dispatcher;
pub mod pipeline;
pub mod pretty_printer;
pub mod semantic_node;
pub mod tree_node;
pub mod visitor;

pub use dispatcher::CompositeVisitor;
pub use pipeline::{build_pipeline, Pipeline, PipelineBuilder, PipelineError, UnitOutput, UnitTransformer};
pub use semantic_node::SemanticNode;
pub use tree_node::{NodeKind, TreeNode};
pub use visitor::{NodeVisitor, NodeVisitorContext, SharedContext, VisitorFactory, VisitorType};
