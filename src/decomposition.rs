// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Decomposition of aggregate measurements into directed flows between the
//! source and sink nodes.
//!
//! The measurements never record which source fed which sink, only totals,
//! so the split is a policy choice.  Two policies are available, and the
//! caller picks one based on where the data comes from:
//!
//! - [`DecompositionMode::Priority`] for single-instant readings: solar
//!   serves the load first, then charges the battery, then is exported;
//!   battery discharge serves the load left over by solar; grid import serves
//!   whatever load remains, and the rest of it charges the battery.
//! - [`DecompositionMode::Proportional`] for totals aggregated over a time
//!   window: every source is split across the sinks in proportion to each
//!   sink's share of the total output.

mod priority;
mod proportional;
mod validation;

use crate::{DecompositionConfig, FlowNodeId, MeasurementSnapshot, Side};

/// The policy used to attribute sources to sinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecompositionMode {
    /// Fixed source precedence, for instantaneous data.
    Priority,
    /// Allocation by output share, for aggregated data.
    Proportional,
}

impl std::fmt::Display for DecompositionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecompositionMode::Priority => write!(f, "Priority"),
            DecompositionMode::Proportional => write!(f, "Proportional"),
        }
    }
}

/// A directed flow from a source node to a sink node.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowEdge {
    source: FlowNodeId,
    target: FlowNodeId,
    value: f64,
}

impl FlowEdge {
    pub(crate) fn new(source: FlowNodeId, target: FlowNodeId, value: f64) -> Self {
        Self {
            source,
            target,
            value,
        }
    }

    pub fn source(&self) -> FlowNodeId {
        self.source
    }

    pub fn target(&self) -> FlowNodeId {
        self.target
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// The own aggregate value of each of the six nodes, after battery direction
/// resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeTotals {
    values: [f64; 6],
}

impl NodeTotals {
    pub(crate) fn from_snapshot(snapshot: &MeasurementSnapshot, epsilon: f64) -> Self {
        let battery = snapshot.battery_flow(epsilon);
        let mut values = [0.0; 6];
        values[FlowNodeId::Solar.index()] = snapshot.solar();
        values[FlowNodeId::BatteryOut.index()] = battery.discharge;
        values[FlowNodeId::GridIn.index()] = snapshot.grid_import();
        values[FlowNodeId::BatteryIn.index()] = battery.charge;
        values[FlowNodeId::Load.index()] = snapshot.load();
        values[FlowNodeId::GridOut.index()] = snapshot.grid_export();
        Self { values }
    }

    /// Returns the value of the given node.
    pub fn get(&self, id: FlowNodeId) -> f64 {
        self.values[id.index()]
    }

    /// Returns the sum of the values of all nodes on the given side.
    pub fn side_total(&self, side: Side) -> f64 {
        FlowNodeId::ALL
            .iter()
            .filter(|id| id.side() == side)
            .map(|id| self.get(*id))
            .sum()
    }
}

/// Flow values indexed by source column position, then sink column position.
pub(crate) type FlowMatrix = [[f64; 3]; 3];

/// The result of decomposing one snapshot: the node totals and the full set
/// of nine candidate edges, zero-valued ones included.
///
/// Near-zero edges are kept here so that conservation can be checked on the
/// raw result; they are dropped when a [`DiagramModel`][crate::DiagramModel]
/// is assembled.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowDecomposition {
    mode: DecompositionMode,
    totals: NodeTotals,
    edges: Vec<FlowEdge>,
}

impl FlowDecomposition {
    /// Decomposes the given snapshot with the given policy.
    pub fn new(
        snapshot: &MeasurementSnapshot,
        mode: DecompositionMode,
        config: &DecompositionConfig,
    ) -> Self {
        let totals = NodeTotals::from_snapshot(snapshot, config.epsilon);
        let matrix = match mode {
            DecompositionMode::Priority => priority::allocate(&totals),
            DecompositionMode::Proportional => proportional::allocate(&totals, config.epsilon),
        };

        let edges = FlowNodeId::SOURCES
            .iter()
            .zip(matrix)
            .flat_map(|(&source, row)| {
                FlowNodeId::SINKS
                    .iter()
                    .zip(row)
                    .map(move |(&target, value)| FlowEdge::new(source, target, value.max(0.0)))
            })
            .collect();

        tracing::trace!(
            "Decomposed snapshot in {mode} mode: in={}, out={}",
            totals.side_total(Side::Source),
            totals.side_total(Side::Sink)
        );

        Self {
            mode,
            totals,
            edges,
        }
    }

    pub fn mode(&self) -> DecompositionMode {
        self.mode
    }

    pub fn totals(&self) -> &NodeTotals {
        &self.totals
    }

    /// Returns all nine candidate edges, ordered by source and then by sink,
    /// each in column order.
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Returns the flow from `source` to `target`, or `0.0` if the pair isn't
    /// a source and a sink.
    pub fn flow(&self, source: FlowNodeId, target: FlowNodeId) -> f64 {
        if !source.is_source() || !target.is_sink() {
            return 0.0;
        }
        self.edges[source.column_position() * 3 + target.column_position()].value
    }

    /// Returns the sum of the edges leaving the given node.
    pub fn outgoing_sum(&self, id: FlowNodeId) -> f64 {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.value)
            .sum()
    }

    /// Returns the sum of the edges entering the given node.
    pub fn incoming_sum(&self, id: FlowNodeId) -> f64 {
        self.edges
            .iter()
            .filter(|e| e.target == id)
            .map(|e| e.value)
            .sum()
    }
}
