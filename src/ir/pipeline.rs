use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::dispatcher::CompositeVisitor;
use super::visitor::{NamedVisitor, NodeVisitorContext, SharedContext, VisitorFactory, VisitorType};
use crate::config::ConfigurationError;
use crate::metrics::TransformStats;

/// Failure to instantiate a pipeline's context
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The context rejected the shape of the configuration value
    #[error("context {context} rejected its configuration")]
    InvalidConfiguration {
        context: &'static str,
        #[source]
        source: ConfigurationError,
    },
    /// The context constructor failed for any other reason
    #[error("failed to construct context {context}")]
    ContextConstruction {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Result of rewriting one compilation unit
///
/// The root of a unit may be deleted or fanned out by the rules like any other node;
/// the host decides what such a unit means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutput<N> {
    /// The root resolved to exactly one node
    Rewritten(Arc<N>),
    /// The root resolved to no node at all
    Deleted,
    /// The root resolved to several nodes, in order
    Expanded(Vec<Arc<N>>),
}

impl<N> UnitOutput<N> {
    fn from_nodes(mut nodes: Vec<Arc<N>>) -> Self {
        match nodes.len() {
            0 => UnitOutput::Deleted,
            1 => UnitOutput::Rewritten(nodes.remove(0)),
            _ => UnitOutput::Expanded(nodes),
        }
    }

    /// Returns the new root if the unit still has exactly one
    pub fn into_root(self) -> Option<Arc<N>> {
        match self {
            UnitOutput::Rewritten(root) => Some(root),
            UnitOutput::Deleted | UnitOutput::Expanded(_) => None,
        }
    }

    /// Returns every node the root resolved to
    pub fn into_nodes(self) -> Vec<Arc<N>> {
        match self {
            UnitOutput::Rewritten(root) => vec![root],
            UnitOutput::Deleted => Vec::new(),
            UnitOutput::Expanded(nodes) => nodes,
        }
    }

    /// True when the root resolved to no node
    pub fn is_deleted(&self) -> bool {
        matches!(self, UnitOutput::Deleted)
    }
}

/// An immutable, ordered list of rule types bound to a context type
///
/// Building a pipeline does no work; [`Pipeline::instantiate`] creates the context for
/// one configuration, and the resulting [`UnitTransformer`] rewrites compilation units.
pub struct Pipeline<C: NodeVisitorContext> {
    visitor_types: Arc<[VisitorType<C>]>,
}

/// Builds a pipeline applying `visitor_types` in order
///
/// An empty list yields a pipeline returning every unit's root unchanged.
pub fn build_pipeline<C: NodeVisitorContext>(visitor_types: Vec<VisitorType<C>>) -> Pipeline<C> {
    Pipeline {
        visitor_types: visitor_types.into(),
    }
}

impl<C: NodeVisitorContext> Pipeline<C> {
    /// Starts a pipeline with no rules
    pub fn builder() -> PipelineBuilder<C> {
        PipelineBuilder {
            visitor_types: Vec::new(),
        }
    }

    /// Names of the rule types, in application order
    pub fn visitor_names(&self) -> Vec<&'static str> {
        self.visitor_types.iter().map(VisitorType::name).collect()
    }

    /// Number of rule types
    pub fn len(&self) -> usize {
        self.visitor_types.len()
    }

    /// True when the pipeline has no rules
    pub fn is_empty(&self) -> bool {
        self.visitor_types.is_empty()
    }

    /// Creates the context for one configuration
    ///
    /// # Arguments
    /// * `program` - Compilation-wide services
    /// * `configuration` - User configuration, of whatever shape the context accepts
    ///
    /// # Returns
    /// A transformer for every unit of this compilation. All units transformed by it
    /// share the context created here.
    pub fn instantiate(
        &self,
        program: &C::Program,
        configuration: &Value,
    ) -> Result<UnitTransformer<C>, PipelineError> {
        let context_name = std::any::type_name::<C>();
        let context = C::new(program, configuration).map_err(|err| {
            match err.downcast::<ConfigurationError>() {
                Ok(source) => PipelineError::InvalidConfiguration {
                    context: context_name,
                    source,
                },
                Err(source) => PipelineError::ContextConstruction {
                    context: context_name,
                    source,
                },
            }
        })?;

        debug!(
            "Instantiated pipeline context {} with {} visitor(s)",
            context_name,
            self.visitor_types.len()
        );

        Ok(UnitTransformer {
            context: Arc::new(Mutex::new(context)),
            visitor_types: Arc::clone(&self.visitor_types),
            last_stats: None,
        })
    }
}

impl<C: NodeVisitorContext> Clone for Pipeline<C> {
    fn clone(&self) -> Self {
        Pipeline {
            visitor_types: Arc::clone(&self.visitor_types),
        }
    }
}

impl<C: NodeVisitorContext> fmt::Debug for Pipeline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("context", &std::any::type_name::<C>())
            .field("visitors", &self.visitor_names())
            .finish()
    }
}

/// Fluent construction of a [`Pipeline`]
pub struct PipelineBuilder<C: NodeVisitorContext> {
    visitor_types: Vec<VisitorType<C>>,
}

impl<C: NodeVisitorContext> PipelineBuilder<C> {
    /// Appends the rule type `V`
    pub fn visitor<V: VisitorFactory<C>>(mut self) -> Self {
        self.visitor_types.push(VisitorType::of::<V>());
        self
    }

    /// Freezes the rule list into a [`Pipeline`]
    pub fn build(self) -> Pipeline<C> {
        build_pipeline(self.visitor_types)
    }
}

/// Per-compilation transform: one context, fresh rules for every unit
pub struct UnitTransformer<C: NodeVisitorContext> {
    context: SharedContext<C>,
    visitor_types: Arc<[VisitorType<C>]>,
    last_stats: Option<TransformStats>,
}

impl<C: NodeVisitorContext> UnitTransformer<C> {
    /// Rewrites one compilation unit
    ///
    /// Initializes the shared context for the unit, constructs one fresh instance of
    /// every rule type, and dispatches them from `root`. Units of one transformer run
    /// one after another; the exclusive borrow keeps a second unit from resetting the
    /// context while rules of the first are still running.
    ///
    /// # Errors
    /// Errors from `init_new_file` or from any rule are returned unchanged and abort
    /// the unit; no partial tree is produced.
    pub fn transform(
        &mut self,
        services: C::Services,
        root: Arc<C::Node>,
    ) -> anyhow::Result<UnitOutput<C::Node>> {
        self.context.lock().init_new_file(services, &root)?;

        let visitors = self
            .visitor_types
            .iter()
            .map(|visitor_type| NamedVisitor {
                name: visitor_type.name(),
                visitor: visitor_type.instantiate(&self.context),
            })
            .collect();

        let mut dispatcher = CompositeVisitor::new(visitors);
        let nodes = dispatcher.visit_node(root)?;
        let stats = dispatcher.into_stats();

        debug!(
            "Rewrote unit: {} node(s) dispatched, {} visit(s), {} deleted, {} inserted, {} root node(s)",
            stats.nodes_dispatched(),
            stats.total_matches(),
            stats.nodes_deleted(),
            stats.nodes_inserted(),
            nodes.len()
        );
        self.last_stats = Some(stats);

        Ok(UnitOutput::from_nodes(nodes))
    }

    /// The context shared by every unit transformed here
    ///
    /// Holding the guard of this lock across [`UnitTransformer::transform`] deadlocks.
    pub fn context(&self) -> &SharedContext<C> {
        &self.context
    }

    /// Statistics of the most recent successful unit
    pub fn last_stats(&self) -> Option<&TransformStats> {
        self.last_stats.as_ref()
    }
}
