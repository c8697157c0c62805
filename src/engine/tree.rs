//! Cost tree construction
//!
//! The tree mirrors the composition graph path by path: a sub-assembly used
//! twice appears twice. Unit costs are rolled up once per distinct product
//! (bottom-up over the validated order) and reused for every occurrence.
//!
//! Path expansion can be exponential in the graph size, so the node count is
//! computed up front and checked against a limit before anything is built.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::cost::{resolve_unit_cost, ResolvedCost, SourceSelector};
use super::cycle::ValidatedGraph;
use super::error::{MissingSourceWarning, ResolveError};
use super::graph::GraphNode;
use super::{checked_add, checked_mul};
use crate::core::identity::{ComponentKey, NodeId, ProductId};
use crate::entities::Source;

/// One occurrence of a node in the cost tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostNode {
    pub id: NodeId,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Quantity on the edge from the parent (1 for the root)
    pub quantity_per_parent: Decimal,

    /// Build quantity times every edge quantity from the root down to here
    pub effective_quantity: Decimal,

    /// Components: selected source cost. Products: rolled-up cost of one unit.
    pub unit_cost: Decimal,

    /// effective_quantity * unit_cost
    pub subtotal: Decimal,

    /// DNP flag on the edge leading here
    pub dnp: bool,

    /// This edge or an ancestor edge is DNP; contributes nothing upward
    pub excluded: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_designators: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    pub missing_source: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CostNode>,
}

impl CostNode {
    /// What this node adds to its parent's subtotal
    pub fn contribution(&self) -> Decimal {
        if self.excluded {
            Decimal::ZERO
        } else {
            self.subtotal
        }
    }

    pub fn is_product(&self) -> bool {
        matches!(self.id, NodeId::Product(_))
    }

    /// Pre-order walk yielding (depth, node)
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Iterator returned by [`CostNode::walk`]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a CostNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a CostNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

/// Result of a cost resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub root: ProductId,
    pub build_quantity: Decimal,

    /// Grand total; equals the root node's subtotal
    pub total: Decimal,

    pub tree: CostNode,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<MissingSourceWarning>,
}

/// Per-unit costs of every node in a validated graph
pub(crate) struct UnitCosts {
    pub components: BTreeMap<ComponentKey, ResolvedCost>,
    pub products: HashMap<ProductId, Decimal>,
}

impl UnitCosts {
    pub fn compute<S: SourceSelector + ?Sized>(
        validated: &ValidatedGraph<'_>,
        selector: &S,
        include_dnp: bool,
    ) -> Result<Self, ResolveError> {
        let graph = validated.graph();
        let components: BTreeMap<ComponentKey, ResolvedCost> = graph
            .nodes()
            .filter_map(|(id, node)| match (id, node) {
                (NodeId::Component(key), GraphNode::Component { sources, .. }) => {
                    Some((key.clone(), resolve_unit_cost(selector, sources)))
                }
                _ => None,
            })
            .collect();

        let mut products: HashMap<ProductId, Decimal> = HashMap::new();
        for product in validated.bottom_up() {
            let mut unit = Decimal::ZERO;
            for edge in graph.children_of(product) {
                if edge.dnp && !include_dnp {
                    continue;
                }
                let child_unit = match &edge.child {
                    NodeId::Component(key) => components
                        .get(key)
                        .map_or(Decimal::ZERO, |c| c.unit_cost),
                    NodeId::Product(id) => products.get(id).copied().unwrap_or(Decimal::ZERO),
                };
                let line = checked_mul(edge.quantity, child_unit, product)?;
                unit = checked_add(unit, line, product)?;
            }
            products.insert(product.clone(), unit);
        }

        Ok(Self {
            components,
            products,
        })
    }

    fn unit_cost(&self, id: &NodeId) -> Decimal {
        match id {
            NodeId::Product(p) => self.products.get(p).copied().unwrap_or(Decimal::ZERO),
            NodeId::Component(k) => self
                .components
                .get(k)
                .map_or(Decimal::ZERO, |c| c.unit_cost),
        }
    }

    fn source(&self, id: &NodeId) -> (Option<Source>, bool) {
        match id {
            NodeId::Product(_) => (None, false),
            NodeId::Component(k) => match self.components.get(k) {
                Some(c) => (c.source.clone(), c.is_missing()),
                None => (None, true),
            },
        }
    }
}

/// Node count of the fully expanded cost tree, or `None` past `usize::MAX`
///
/// One pass over the bottom-up order: a product expands to itself plus the
/// expansion of every child edge.
pub fn expanded_size(validated: &ValidatedGraph<'_>) -> Option<usize> {
    let graph = validated.graph();
    let mut sizes: HashMap<&ProductId, usize> = HashMap::new();
    for product in validated.bottom_up() {
        let mut size: usize = 1;
        for edge in graph.children_of(product) {
            let child = match &edge.child {
                NodeId::Product(id) => sizes.get(id).copied().unwrap_or(1),
                NodeId::Component(_) => 1,
            };
            size = size.checked_add(child)?;
        }
        sizes.insert(product, size);
    }
    sizes.get(graph.root()).copied()
}

struct Pending {
    node: CostNode,
    parent: usize,
}

/// Build the cost tree for `build_quantity` units of the graph's root
pub fn build_cost_tree<S: SourceSelector + ?Sized>(
    validated: &ValidatedGraph<'_>,
    build_quantity: Decimal,
    selector: &S,
    include_dnp: bool,
    max_nodes: usize,
) -> Result<CostReport, ResolveError> {
    let graph = validated.graph();
    let root = graph.root().clone();
    let size = match expanded_size(validated) {
        Some(n) if n <= max_nodes => n,
        nodes => {
            tracing::debug!(root = %root, ?nodes, limit = max_nodes, "cost tree too large");
            return Err(ResolveError::TreeTooLarge {
                root,
                nodes,
                limit: max_nodes,
            });
        }
    };
    let costs = UnitCosts::compute(validated, selector, include_dnp)?;
    let root_id = NodeId::Product(root.clone());

    let describe = |id: &NodeId| {
        graph
            .node(id)
            .map(|n| n.description().to_string())
            .unwrap_or_default()
    };

    let root_unit = costs.unit_cost(&root_id);
    let mut arena = Vec::with_capacity(size);
    arena.push(Pending {
        node: CostNode {
            description: describe(&root_id),
            quantity_per_parent: Decimal::ONE,
            effective_quantity: build_quantity,
            unit_cost: root_unit,
            subtotal: checked_mul(build_quantity, root_unit, &root)?,
            dnp: false,
            excluded: false,
            reference_designators: Vec::new(),
            source: None,
            missing_source: false,
            children: Vec::new(),
            id: root_id,
        },
        parent: 0,
    });

    let mut missing: BTreeSet<ComponentKey> = BTreeSet::new();
    let mut stack = vec![0usize];

    while let Some(idx) = stack.pop() {
        let (parent, parent_qty, parent_excluded) = match &arena[idx].node.id {
            NodeId::Product(p) => (
                p.clone(),
                arena[idx].node.effective_quantity,
                arena[idx].node.excluded,
            ),
            NodeId::Component(_) => continue,
        };

        for edge in graph.children_of(&parent) {
            let excluded = parent_excluded || (edge.dnp && !include_dnp);
            let effective_quantity = checked_mul(parent_qty, edge.quantity, &edge.child)?;
            let unit_cost = costs.unit_cost(&edge.child);
            let (source, missing_source) = costs.source(&edge.child);
            if missing_source && !excluded {
                if let NodeId::Component(key) = &edge.child {
                    missing.insert(key.clone());
                }
            }

            let child_idx = arena.len();
            arena.push(Pending {
                node: CostNode {
                    id: edge.child.clone(),
                    description: describe(&edge.child),
                    quantity_per_parent: edge.quantity,
                    effective_quantity,
                    unit_cost,
                    subtotal: checked_mul(effective_quantity, unit_cost, &edge.child)?,
                    dnp: edge.dnp,
                    excluded,
                    reference_designators: edge.reference_designators.clone(),
                    source,
                    missing_source,
                    children: Vec::new(),
                },
                parent: idx,
            });
            stack.push(child_idx);
        }
    }

    // Children are always allocated after their parent, so popping from the
    // back hands every node to its parent only once its own subtree is complete.
    while arena.len() > 1 {
        let Some(Pending { mut node, parent }) = arena.pop() else {
            break;
        };
        node.children.reverse();
        arena[parent].node.children.push(node);
    }
    let mut tree = arena.swap_remove(0).node;
    tree.children.reverse();

    let warnings = missing_warnings(graph, missing);
    for warning in &warnings {
        tracing::debug!(component = %warning.component, "no source; costed at zero");
    }

    Ok(CostReport {
        total: tree.subtotal,
        root,
        build_quantity,
        tree,
        warnings,
    })
}

pub(crate) fn missing_warnings(
    graph: &super::graph::CompositionGraph,
    missing: BTreeSet<ComponentKey>,
) -> Vec<MissingSourceWarning> {
    missing
        .into_iter()
        .map(|component| MissingSourceWarning {
            description: graph
                .component(&component)
                .map(|(c, _)| c.description.clone())
                .unwrap_or_default(),
            component,
        })
        .collect()
}
