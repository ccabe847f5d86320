// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for assembling a [`DiagramModel`] from a decomposition.

use petgraph::graph::DiGraph;

use crate::{
    DecompositionConfig, DecompositionMode, FlowDecomposition, FlowEdge, FlowNodeId,
    MeasurementSnapshot, Side,
};

use super::{DiagramModel, FlowNode, NodeIndexMap};

/// `DiagramModel` instantiation.
impl DiagramModel {
    /// Decomposes the given snapshot and assembles the resulting model.
    pub fn new(
        snapshot: &MeasurementSnapshot,
        mode: DecompositionMode,
        config: &DecompositionConfig,
    ) -> Self {
        Self::from_decomposition(&FlowDecomposition::new(snapshot, mode, config), config)
    }

    /// Assembles a model from an existing decomposition.
    ///
    /// Edges below `config.epsilon` are dropped, nodes without any remaining
    /// edge are left out, and each kept node gets its percentage of the
    /// total of the kept nodes on its side.
    pub fn from_decomposition(
        decomposition: &FlowDecomposition,
        config: &DecompositionConfig,
    ) -> Self {
        if let Err(err) = decomposition.validate_conservation(config.epsilon) {
            tracing::debug!("Decomposition doesn't conserve energy: {err}");
        }

        let links: Vec<FlowEdge> = decomposition
            .edges()
            .iter()
            .filter(|e| e.value() > 0.0 && e.value() >= config.epsilon)
            .copied()
            .collect();

        let carries_flow =
            |id: FlowNodeId| links.iter().any(|l| l.source() == id || l.target() == id);
        let side_total = |side: Side| -> f64 {
            FlowNodeId::ALL
                .iter()
                .filter(|id| id.side() == side && carries_flow(**id))
                .map(|id| decomposition.totals().get(*id))
                .sum()
        };
        let source_total = side_total(Side::Source);
        let sink_total = side_total(Side::Sink);

        let mut graph = DiGraph::new();
        let mut node_indices = NodeIndexMap::new();

        for id in FlowNodeId::ALL {
            if !carries_flow(id) {
                continue;
            }
            let value = decomposition.totals().get(id);
            let total = match id.side() {
                Side::Source => source_total,
                Side::Sink => sink_total,
            };
            let percentage = if total > 0.0 {
                value / total * 100.0
            } else {
                0.0
            };
            let idx = graph.add_node(FlowNode {
                id,
                value,
                percentage,
            });
            node_indices.insert(id, idx);
        }

        for link in links {
            let source_idx = node_indices[&link.source()];
            let target_idx = node_indices[&link.target()];
            graph.add_edge(source_idx, target_idx, link);
        }

        if graph.edge_count() == 0 {
            tracing::debug!(
                "No energy flow in {} decomposition.",
                decomposition.mode()
            );
        }

        Self {
            graph,
            node_indices,
            mode: decomposition.mode(),
        }
    }
}
