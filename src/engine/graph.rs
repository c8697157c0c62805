//! Composition graph loading
//!
//! Materializes everything reachable from a root product in one
//! breadth-first pass over the catalog. This is the only place the engine
//! talks to the catalog; everything downstream works on the loaded graph.

use std::collections::{BTreeMap, HashSet, VecDeque};

use super::error::{RecordKind, ResolveError};
use crate::core::catalog::Catalog;
use crate::core::identity::{ComponentKey, NodeId, ProductId};
use crate::entities::{CompositionEdge, Component, Product, Source};

/// A loaded graph node
#[derive(Debug, Clone)]
pub enum GraphNode {
    Product(Product),
    Component {
        component: Component,
        sources: Vec<Source>,
    },
}

impl GraphNode {
    pub fn description(&self) -> &str {
        match self {
            GraphNode::Product(p) => &p.description,
            GraphNode::Component { component, .. } => &component.description,
        }
    }
}

/// Subgraph reachable from one root product
///
/// Nodes are unique; edges are the full multiset, so a component used by
/// two sub-assemblies keeps both edges.
#[derive(Debug, Clone)]
pub struct CompositionGraph {
    root: ProductId,
    nodes: BTreeMap<NodeId, GraphNode>,
    edges: Vec<CompositionEdge>,
    /// Edge indices per parent, in catalog order
    outgoing: BTreeMap<ProductId, Vec<usize>>,
}

impl CompositionGraph {
    /// Load the subgraph reachable from `root`
    pub fn load<C: Catalog + ?Sized>(catalog: &C, root: &ProductId) -> Result<Self, ResolveError> {
        let mut graph = Self {
            root: root.clone(),
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            outgoing: BTreeMap::new(),
        };

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<(NodeId, Option<ProductId>)> = VecDeque::new();
        seen.insert(NodeId::Product(root.clone()));
        queue.push_back((NodeId::Product(root.clone()), None));

        while let Some((node, referenced_by)) = queue.pop_front() {
            match node {
                NodeId::Product(id) => {
                    let product = catalog.product(&id)?.ok_or_else(|| ResolveError::NotFound {
                        kind: RecordKind::Product,
                        id: id.to_string(),
                        referenced_by: referenced_by.clone(),
                    })?;

                    let children = catalog.child_edges(&id)?;
                    tracing::trace!(product = %id, children = children.len(), "loaded product");

                    let mut indices = Vec::with_capacity(children.len());
                    for edge in children {
                        if seen.insert(edge.child.clone()) {
                            queue.push_back((edge.child.clone(), Some(id.clone())));
                        }
                        indices.push(graph.edges.len());
                        graph.edges.push(edge);
                    }
                    graph.outgoing.insert(id.clone(), indices);
                    graph.nodes.insert(NodeId::Product(id), GraphNode::Product(product));
                }
                NodeId::Component(key) => {
                    let component =
                        catalog.component(&key)?.ok_or_else(|| ResolveError::NotFound {
                            kind: RecordKind::Component,
                            id: key.to_string(),
                            referenced_by: referenced_by.clone(),
                        })?;
                    let sources = catalog.sources_for(&key)?;
                    graph.nodes.insert(
                        NodeId::Component(key),
                        GraphNode::Component { component, sources },
                    );
                }
            }
        }

        tracing::debug!(
            root = %root,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "loaded composition graph"
        );

        Ok(graph)
    }

    pub fn root(&self) -> &ProductId {
        &self.root
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &GraphNode)> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> &[CompositionEdge] {
        &self.edges
    }

    /// Edges owned by a product, in catalog order
    pub fn children_of<'g>(
        &'g self,
        id: &ProductId,
    ) -> impl Iterator<Item = &'g CompositionEdge> + 'g {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    pub fn component(&self, key: &ComponentKey) -> Option<(&Component, &[Source])> {
        match self.nodes.get(&NodeId::Component(key.clone())) {
            Some(GraphNode::Component { component, sources }) => Some((component, sources)),
            _ => None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn product_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn component_count(&self) -> usize {
        self.node_count() - self.product_count()
    }

    /// Nodes with more than one incoming edge (shared reuse)
    pub fn shared_nodes(&self) -> usize {
        let mut incoming: BTreeMap<&NodeId, usize> = BTreeMap::new();
        for edge in &self.edges {
            *incoming.entry(&edge.child).or_default() += 1;
        }
        incoming.values().filter(|&&n| n > 1).count()
    }
}
