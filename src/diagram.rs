// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The materialized flow graph handed to the layout and rendering stages:
//! the nodes that carry flow, their share of their side, and the links
//! between them.

mod assembly;
pub mod iterators;
mod retrieval;

use crate::{DecompositionMode, FlowEdge, FlowNodeId, Side};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// `FlowNode`s stored in a `DiGraph` instance can be addressed with
/// `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any `FlowNodeId`,
/// so that nodes in the `DiGraph` can be retrieved from their ids.
pub(crate) type NodeIndexMap = HashMap<FlowNodeId, NodeIndex>;

/// A node of the diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowNode {
    id: FlowNodeId,
    value: f64,
    percentage: f64,
}

impl FlowNode {
    pub fn id(&self) -> FlowNodeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn side(&self) -> Side {
        self.id.side()
    }

    /// The node's own measured value, not the sum of its links.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The node's share of the total of the diagram nodes on its side, in
    /// percent.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

/// The flow graph of one decomposition, restricted to links at or above the
/// epsilon threshold and to the nodes those links touch.
///
/// Nodes are stored in column order, sources first, and links in the order
/// of [`FlowDecomposition::edges`][crate::FlowDecomposition::edges].  A model
/// without links represents the "no flow" state.
#[derive(Clone, Debug)]
pub struct DiagramModel {
    graph: DiGraph<FlowNode, FlowEdge>,
    node_indices: NodeIndexMap,
    mode: DecompositionMode,
}

#[cfg(test)]
pub(crate) mod test_utils {
    //! Helpers shared by the tests of the `diagram` and `layout` modules.

    use crate::MeasurementSnapshot;

    /// A builder for snapshots that balance by construction: grid import or
    /// export is derived from the other measurements.
    #[derive(Default)]
    pub(crate) struct BalancedSnapshot {
        solar: f64,
        load: f64,
        battery_net: f64,
    }

    impl BalancedSnapshot {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn solar(mut self, solar: f64) -> Self {
            self.solar = solar;
            self
        }

        pub(crate) fn load(mut self, load: f64) -> Self {
            self.load = load;
            self
        }

        /// Positive when charging, negative when discharging.
        pub(crate) fn battery(mut self, battery_net: f64) -> Self {
            self.battery_net = battery_net;
            self
        }

        pub(crate) fn build(self) -> MeasurementSnapshot {
            let grid_net = self.solar - self.load - self.battery_net;
            MeasurementSnapshot::new(
                self.solar,
                self.battery_net.max(0.0),
                (-self.battery_net).max(0.0),
                (-grid_net).max(0.0),
                grid_net.max(0.0),
                self.load,
            )
            .with_battery_net(self.battery_net)
        }
    }
}
