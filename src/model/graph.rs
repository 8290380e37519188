//! Resolved dependency graph as handed over by the build's resolver.
//!
//! The graph is an arena keyed by [`ComponentId`]: nodes reference their
//! children by identity, so shared sub-trees are represented once. The
//! compiler only reads it.

use super::ComponentId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outcome of resolving one declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DependencyResult {
    /// The resolver selected a concrete component for this request
    Resolved { selected: ComponentId },
    /// The request could not be satisfied; skipped during compilation
    Unresolved {
        requested: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl DependencyResult {
    /// The selected component, if resolution succeeded
    #[must_use]
    pub const fn selected(&self) -> Option<&ComponentId> {
        match self {
            Self::Resolved { selected } => Some(selected),
            Self::Unresolved { .. } => None,
        }
    }
}

/// One node of the resolved graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedComponent {
    /// Identity of the component
    pub id: ComponentId,
    /// Name of the repository the component was resolved from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Outgoing dependency results in declaration order
    #[serde(default)]
    pub dependencies: Vec<DependencyResult>,
}

impl ResolvedComponent {
    /// Create a node with no dependencies
    pub fn new(id: ComponentId) -> Self {
        Self {
            id,
            repository: None,
            dependencies: Vec::new(),
        }
    }

    /// Set the repository the component came from
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Add a resolved dependency
    #[must_use]
    pub fn depends_on(mut self, child: ComponentId) -> Self {
        self.dependencies
            .push(DependencyResult::Resolved { selected: child });
        self
    }

    /// Add an unresolved dependency request
    #[must_use]
    pub fn with_unresolved(mut self, requested: impl Into<String>) -> Self {
        self.dependencies.push(DependencyResult::Unresolved {
            requested: requested.into(),
            reason: None,
        });
        self
    }

    /// Selected children in declaration order, skipping failed requests
    pub fn resolved_children(&self) -> impl DoubleEndedIterator<Item = &ComponentId> {
        self.dependencies.iter().filter_map(DependencyResult::selected)
    }
}

/// Arena of resolved components keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: IndexMap<ComponentId, ResolvedComponent>,
}

impl DependencyGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. A later node with the same identity replaces the earlier one.
    pub fn insert(&mut self, node: ResolvedComponent) -> Option<ResolvedComponent> {
        self.nodes.insert(node.id.clone(), node)
    }

    /// Look up a node by identity
    #[must_use]
    pub fn node(&self, id: &ComponentId) -> Option<&ResolvedComponent> {
        self.nodes.get(id)
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedComponent> {
        self.nodes.values()
    }
}

impl FromIterator<ResolvedComponent> for DependencyGraph {
    fn from_iter<I: IntoIterator<Item = ResolvedComponent>>(iter: I) -> Self {
        let mut graph = Self::new();
        for node in iter {
            graph.insert(node);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_children_skip_unresolved() {
        let node = ResolvedComponent::new(ComponentId::project(":app"))
            .depends_on(ComponentId::module("g", "a", "1"))
            .with_unresolved("g:missing:+")
            .depends_on(ComponentId::module("g", "b", "1"));

        let children: Vec<_> = node.resolved_children().map(ToString::to_string).collect();
        assert_eq!(children, vec!["g:a:1", "g:b:1"]);
    }

    #[test]
    fn test_graph_lookup() {
        let graph: DependencyGraph = vec![
            ResolvedComponent::new(ComponentId::project(":app")),
            ResolvedComponent::new(ComponentId::module("g", "a", "1")).with_repository("central"),
        ]
        .into_iter()
        .collect();

        assert_eq!(graph.len(), 2);
        let node = graph
            .node(&ComponentId::module("g", "a", "1"))
            .expect("node should exist");
        assert_eq!(node.repository.as_deref(), Some("central"));
        assert!(graph.node(&ComponentId::project(":missing")).is_none());
    }

    #[test]
    fn test_dependency_result_json() {
        let result: DependencyResult = serde_json::from_str(
            r#"{"state":"resolved","selected":{"kind":"project","path":":lib"}}"#,
        )
        .expect("resolved result should parse");
        assert_eq!(result.selected(), Some(&ComponentId::project(":lib")));

        let result: DependencyResult =
            serde_json::from_str(r#"{"state":"unresolved","requested":"g:a:+"}"#)
                .expect("unresolved result should parse");
        assert!(result.selected().is_none());
    }
}
