use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{
    AddHandlerUriToActions, FixUrisOfNestedHandlers, HandleCustomFullUri, HandleCustomHttpMethods,
    HandleCustomMiddleware, HandleCustomRouteName, HandleCustomUri,
};
use crate::node_tree::Node;

/// A pass over the whole node tree.
pub trait NodeTransformer {
    fn name(&self) -> &str;

    /// Rewrite `nodes` in place. Running a pass twice must not change the
    /// result of running it once.
    fn transform(&self, nodes: &mut [Node]);
}

/// Built-in passes, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerKind {
    AddHandlerUriToActions,
    HandleCustomRouteName,
    HandleCustomMiddleware,
    HandleCustomHttpMethods,
    FixUrisOfNestedHandlers,
    HandleCustomUri,
    HandleCustomFullUri,
}

impl TransformerKind {
    #[must_use]
    pub fn default_order() -> Vec<TransformerKind> {
        vec![
            TransformerKind::AddHandlerUriToActions,
            TransformerKind::HandleCustomRouteName,
            TransformerKind::HandleCustomMiddleware,
            TransformerKind::HandleCustomHttpMethods,
            TransformerKind::FixUrisOfNestedHandlers,
            TransformerKind::HandleCustomUri,
            TransformerKind::HandleCustomFullUri,
        ]
    }

    #[must_use]
    pub fn build(self) -> Box<dyn NodeTransformer> {
        match self {
            TransformerKind::AddHandlerUriToActions => Box::new(AddHandlerUriToActions),
            TransformerKind::HandleCustomRouteName => Box::new(HandleCustomRouteName),
            TransformerKind::HandleCustomMiddleware => Box::new(HandleCustomMiddleware),
            TransformerKind::HandleCustomHttpMethods => Box::new(HandleCustomHttpMethods),
            TransformerKind::FixUrisOfNestedHandlers => Box::new(FixUrisOfNestedHandlers),
            TransformerKind::HandleCustomUri => Box::new(HandleCustomUri),
            TransformerKind::HandleCustomFullUri => Box::new(HandleCustomFullUri),
        }
    }
}

/// Ordered list of passes.
pub struct Pipeline {
    transformers: Vec<Box<dyn NodeTransformer>>,
}

impl Pipeline {
    /// A pipeline with no passes at all.
    #[must_use]
    pub fn empty() -> Self {
        Pipeline {
            transformers: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_kinds(kinds: &[TransformerKind]) -> Self {
        Pipeline {
            transformers: kinds.iter().map(|kind| kind.build()).collect(),
        }
    }

    /// Append a pass after the existing ones.
    pub fn push(&mut self, transformer: impl NodeTransformer + 'static) -> &mut Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn run(&self, nodes: &mut [Node]) {
        for transformer in &self.transformers {
            debug!(
                transformer = transformer.name(),
                nodes_count = nodes.len(),
                "running node transformer"
            );
            transformer.transform(nodes);
        }
    }

    /// Pass names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::from_kinds(&TransformerKind::default_order())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("transformers", &self.names())
            .finish()
    }
}
