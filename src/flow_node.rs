// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `FlowNodeId` enum, which identifies the six
//! abstract nodes of an energy flow diagram, and the `Side` enum, which
//! represents the diagram column a node belongs to.

use std::fmt::Display;

/// The column of the diagram a node is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Where energy comes from: solar, battery discharge and grid import.
    Source,
    /// Where energy goes to: battery charge, load and grid export.
    Sink,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "Source"),
            Side::Sink => write!(f, "Sink"),
        }
    }
}

/// Identifies one of the abstract nodes of the flow graph.
///
/// The battery and the grid each appear twice, once per column, because
/// energy can flow out of and into both of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowNodeId {
    Solar,
    BatteryOut,
    GridIn,
    BatteryIn,
    Load,
    GridOut,
}

impl FlowNodeId {
    /// Source nodes, in the order they are stacked in the source column.
    pub const SOURCES: [FlowNodeId; 3] =
        [FlowNodeId::Solar, FlowNodeId::BatteryOut, FlowNodeId::GridIn];

    /// Sink nodes, in the order they are stacked in the sink column.
    pub const SINKS: [FlowNodeId; 3] =
        [FlowNodeId::BatteryIn, FlowNodeId::Load, FlowNodeId::GridOut];

    /// All nodes, sources first.
    pub const ALL: [FlowNodeId; 6] = [
        FlowNodeId::Solar,
        FlowNodeId::BatteryOut,
        FlowNodeId::GridIn,
        FlowNodeId::BatteryIn,
        FlowNodeId::Load,
        FlowNodeId::GridOut,
    ];

    /// Returns the column this node belongs to.
    pub fn side(self) -> Side {
        match self {
            FlowNodeId::Solar | FlowNodeId::BatteryOut | FlowNodeId::GridIn => Side::Source,
            FlowNodeId::BatteryIn | FlowNodeId::Load | FlowNodeId::GridOut => Side::Sink,
        }
    }

    /// Returns the display name of the node.
    pub fn name(self) -> &'static str {
        match self {
            FlowNodeId::Solar => "Solar",
            FlowNodeId::BatteryOut => "Battery Out",
            FlowNodeId::GridIn => "Grid In",
            FlowNodeId::BatteryIn => "Battery In",
            FlowNodeId::Load => "Load",
            FlowNodeId::GridOut => "Grid Out",
        }
    }

    pub fn is_source(self) -> bool {
        self.side() == Side::Source
    }

    pub fn is_sink(self) -> bool {
        self.side() == Side::Sink
    }

    /// Position of the node within its column, top to bottom.
    pub(crate) fn column_position(self) -> usize {
        match self {
            FlowNodeId::Solar | FlowNodeId::BatteryIn => 0,
            FlowNodeId::BatteryOut | FlowNodeId::Load => 1,
            FlowNodeId::GridIn | FlowNodeId::GridOut => 2,
        }
    }

    /// Position of the node in [`FlowNodeId::ALL`].
    pub(crate) fn index(self) -> usize {
        match self.side() {
            Side::Source => self.column_position(),
            Side::Sink => 3 + self.column_position(),
        }
    }
}

impl Display for FlowNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
