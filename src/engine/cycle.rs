//! Cycle and depth validation
//!
//! Iterative depth-first search with an explicit frame stack. Each product
//! is unvisited, on the current path, or done. An edge back into an on-path
//! product is a cycle; an edge into a done product is shared reuse.

use std::collections::HashMap;

use super::error::ResolveError;
use super::graph::CompositionGraph;
use crate::core::identity::{NodeId, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// A graph proven acyclic and within the depth limit
#[derive(Debug)]
pub struct ValidatedGraph<'g> {
    graph: &'g CompositionGraph,
    /// Products ordered children-before-parents
    order: Vec<ProductId>,
    depth: usize,
}

impl<'g> ValidatedGraph<'g> {
    pub fn graph(&self) -> &'g CompositionGraph {
        self.graph
    }

    /// Products in an order where every sub-assembly precedes its parents
    pub fn bottom_up(&self) -> &[ProductId] {
        &self.order
    }

    /// Edges on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.depth
    }
}

struct Frame<'g> {
    product: &'g ProductId,
    children: Vec<&'g ProductId>,
    next: usize,
}

impl<'g> Frame<'g> {
    fn new(graph: &'g CompositionGraph, product: &'g ProductId) -> Self {
        let children = graph
            .children_of(product)
            .filter_map(|e| e.child.as_product())
            .collect();
        Self {
            product,
            children,
            next: 0,
        }
    }
}

/// Check that the graph is a DAG rooted at its root, no deeper than `max_depth`
pub fn validate(
    graph: &CompositionGraph,
    max_depth: usize,
) -> Result<ValidatedGraph<'_>, ResolveError> {
    let mut marks: HashMap<&ProductId, Mark> = HashMap::new();
    let mut order = Vec::new();

    let root = graph.root();
    marks.insert(root, Mark::OnPath);
    let mut stack = vec![Frame::new(graph, root)];

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.children.get(frame.next) {
            frame.next += 1;
            match marks.get(child) {
                Some(Mark::Done) => {}
                Some(Mark::OnPath) => {
                    let start = stack
                        .iter()
                        .position(|f| f.product == child)
                        .unwrap_or(0);
                    let mut path: Vec<ProductId> =
                        stack[start..].iter().map(|f| f.product.clone()).collect();
                    path.push(child.clone());
                    tracing::debug!(cycle = ?path, "composition cycle detected");
                    return Err(ResolveError::Cycle { path });
                }
                None => {
                    marks.insert(child, Mark::OnPath);
                    stack.push(Frame::new(graph, child));
                }
            }
        } else {
            let done = frame.product;
            marks.insert(done, Mark::Done);
            order.push(done.clone());
            stack.pop();
        }
    }

    let depth = longest_path(graph, &order);
    if depth > max_depth {
        return Err(ResolveError::DepthExceeded {
            limit: max_depth,
            depth,
        });
    }

    tracing::trace!(root = %root, depth, products = order.len(), "graph validated");

    Ok(ValidatedGraph {
        graph,
        order,
        depth,
    })
}

/// Longest root-to-leaf path in edges, computed bottom-up
fn longest_path(graph: &CompositionGraph, bottom_up: &[ProductId]) -> usize {
    let mut height: HashMap<&ProductId, usize> = HashMap::new();
    for product in bottom_up {
        let h = graph
            .children_of(product)
            .map(|edge| match &edge.child {
                NodeId::Product(child) => height.get(child).copied().unwrap_or(0) + 1,
                NodeId::Component(_) => 1,
            })
            .max()
            .unwrap_or(0);
        height.insert(product, h);
    }
    height.get(graph.root()).copied().unwrap_or(0)
}
