// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Iterators over nodes and links in a `DiagramModel`.

use petgraph::graph::{DiGraph, NodeIndex};

use crate::{FlowEdge, FlowNode};

/// An iterator over the nodes in a `DiagramModel`, in column order.
pub struct Nodes<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Node<FlowNode>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a FlowNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|n| &n.weight)
    }
}

/// An iterator over the links in a `DiagramModel`, in decomposition order.
pub struct Links<'a> {
    pub(crate) iter: std::slice::Iter<'a, petgraph::graph::Edge<FlowEdge>>,
}

impl<'a> Iterator for Links<'a> {
    type Item = &'a FlowEdge;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|e| &e.weight)
    }
}

/// An iterator over the nodes linked to a node in a `DiagramModel`, in
/// column order.
pub struct Neighbors<'a> {
    pub(crate) graph: &'a DiGraph<FlowNode, FlowEdge>,
    pub(crate) iter: std::vec::IntoIter<NodeIndex>,
}

impl<'a> Neighbors<'a> {
    pub(crate) fn new(
        graph: &'a DiGraph<FlowNode, FlowEdge>,
        neighbors: petgraph::graph::Neighbors<'a, FlowEdge>,
    ) -> Self {
        // Node indices follow column order, petgraph yields the most recently
        // added edge first.
        let mut indices: Vec<NodeIndex> = neighbors.collect();
        indices.sort();
        indices.dedup();
        Self {
            graph,
            iter: indices.into_iter(),
        }
    }
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a FlowNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| &self.graph[i])
    }
}
