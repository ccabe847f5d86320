// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for retrieving nodes and links from a [`DiagramModel`].

use crate::iterators::{Links, Neighbors, Nodes};
use crate::{DecompositionMode, DiagramModel, Error, FlowEdge, FlowNode, FlowNodeId, Side};

/// `FlowNode` and `FlowEdge` retrieval.
impl DiagramModel {
    /// Returns false when no link reached the epsilon threshold, which the
    /// caller should render as a neutral "no flow" state.
    pub fn has_flow(&self) -> bool {
        self.graph.edge_count() > 0
    }

    /// Returns the policy the model was decomposed with.
    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    /// Returns the node with the given id, if it carries any flow.
    pub fn node(&self, id: FlowNodeId) -> Result<&FlowNode, Error> {
        self.node_indices
            .get(&id)
            .map(|i| &self.graph[*i])
            .ok_or_else(|| Error::node_not_found(format!("Node {} not found.", id)))
    }

    /// Returns an iterator over the nodes in the model.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            iter: self.graph.raw_nodes().iter(),
        }
    }

    /// Returns an iterator over the links in the model.
    pub fn links(&self) -> Links<'_> {
        Links {
            iter: self.graph.raw_edges().iter(),
        }
    }

    /// Returns an iterator over the nodes of one column, top to bottom.
    pub fn column(&self, side: Side) -> impl Iterator<Item = &FlowNode> + '_ {
        self.nodes().filter(move |n| n.side() == side)
    }

    /// Returns an iterator over the links leaving the given node.
    ///
    /// Returns an error if the given node is not part of the model.
    pub fn outgoing(&self, id: FlowNodeId) -> Result<impl Iterator<Item = &FlowEdge> + '_, Error> {
        self.node(id)?;
        Ok(self.links().filter(move |l| l.source() == id))
    }

    /// Returns an iterator over the links entering the given node.
    ///
    /// Returns an error if the given node is not part of the model.
    pub fn incoming(&self, id: FlowNodeId) -> Result<impl Iterator<Item = &FlowEdge> + '_, Error> {
        self.node(id)?;
        Ok(self.links().filter(move |l| l.target() == id))
    }

    /// Returns the sum of the links leaving the given node.
    pub fn outgoing_total(&self, id: FlowNodeId) -> Result<f64, Error> {
        Ok(self.outgoing(id)?.map(|l| l.value()).sum())
    }

    /// Returns the sum of the links entering the given node.
    pub fn incoming_total(&self, id: FlowNodeId) -> Result<f64, Error> {
        Ok(self.incoming(id)?.map(|l| l.value()).sum())
    }

    /// Returns an iterator over the sinks fed by the given source.
    ///
    /// Returns an error if the given node is not part of the model.
    pub fn targets(&self, id: FlowNodeId) -> Result<Neighbors<'_>, Error> {
        self.node_indices
            .get(&id)
            .map(|&index| {
                Neighbors::new(
                    &self.graph,
                    self.graph
                        .neighbors_directed(index, petgraph::Direction::Outgoing),
                )
            })
            .ok_or_else(|| Error::node_not_found(format!("Node {} not found.", id)))
    }

    /// Returns an iterator over the sources feeding the given sink.
    ///
    /// Returns an error if the given node is not part of the model.
    pub fn sources(&self, id: FlowNodeId) -> Result<Neighbors<'_>, Error> {
        self.node_indices
            .get(&id)
            .map(|&index| {
                Neighbors::new(
                    &self.graph,
                    self.graph
                        .neighbors_directed(index, petgraph::Direction::Incoming),
                )
            })
            .ok_or_else(|| Error::node_not_found(format!("Node {} not found.", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::test_utils::BalancedSnapshot;
    use crate::DecompositionConfig;

    use FlowNodeId::*;

    fn model() -> DiagramModel {
        // Evening: solar, the battery and the grid all feed the load.
        let snapshot = BalancedSnapshot::new().solar(1.0).load(4.0).battery(-2.0).build();
        DiagramModel::new(
            &snapshot,
            DecompositionMode::Priority,
            &DecompositionConfig::default(),
        )
    }

    #[test]
    fn test_node() -> Result<(), Error> {
        let model = model();

        assert_eq!(model.node(Solar)?.value(), 1.0);
        assert_eq!(model.node(BatteryOut)?.value(), 2.0);
        assert_eq!(model.node(GridIn)?.value(), 1.0);
        assert_eq!(model.node(Load)?.name(), "Load");
        assert_eq!(
            model.node(GridOut),
            Err(Error::node_not_found("Node Grid Out not found."))
        );

        Ok(())
    }

    #[test]
    fn test_columns() {
        let model = model();

        assert!(model
            .column(Side::Source)
            .map(|n| n.id())
            .eq([Solar, BatteryOut, GridIn]));
        assert!(model.column(Side::Sink).map(|n| n.id()).eq([Load]));
    }

    #[test]
    fn test_links() -> Result<(), Error> {
        let model = model();

        assert!(model
            .links()
            .map(|l| (l.source(), l.target(), l.value()))
            .eq([(Solar, Load, 1.0), (BatteryOut, Load, 2.0), (GridIn, Load, 1.0)]));

        assert!(model.outgoing(BatteryOut)?.map(|l| l.target()).eq([Load]));
        assert_eq!(model.incoming(Load)?.count(), 3);
        assert_eq!(model.outgoing_total(Solar)?, 1.0);
        assert_eq!(model.incoming_total(Load)?, 4.0);
        assert!(model
            .incoming_total(BatteryIn)
            .is_err_and(|e| e == Error::node_not_found("Node Battery In not found.")));

        Ok(())
    }

    #[test]
    fn test_neighbors() -> Result<(), Error> {
        let model = model();

        assert!(model
            .sources(Load)?
            .map(|n| n.id())
            .eq([Solar, BatteryOut, GridIn]));
        assert!(model.targets(GridIn)?.map(|n| n.id()).eq([Load]));
        assert!(model.targets(Load)?.next().is_none());
        assert!(model
            .sources(GridOut)
            .is_err_and(|e| e == Error::node_not_found("Node Grid Out not found.")));

        Ok(())
    }
}
