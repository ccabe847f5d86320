// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Energy Flow Diagram

This is a library for turning the aggregate power or energy measurements of a
home energy installation (solar, battery, grid and load) into a flow diagram:
which source fed which sink, and how much.

The measurements only record totals per device, never the path energy took,
so the flows are inferred with a documented policy, and then laid out as a
two-column diagram, sources on the left and sinks on the right, with node
sizes and link widths proportional to the flows.

## The pipeline

1. A [`MeasurementSnapshot`] holds the six measurements for one instant or one
   time window, and optionally the signed battery power.
2. A [`FlowDecomposition`] splits the sources `Solar`, `Battery Out` and
   `Grid In` across the sinks `Battery In`, `Load` and `Grid Out`, using the
   [`DecompositionMode`] chosen by the caller.
3. A [`DiagramModel`] keeps the flows above the epsilon threshold from
   [`DecompositionConfig`], and the nodes they touch, with each node's share
   of its side.
4. A [`LayoutEngine`] computes the node rectangles and the link curves for a
   canvas size, as a [`DiagramLayout`] ready to be drawn by any vector
   graphics backend.

[`LayoutEngine::render`] runs all of these steps in one call.  All of them are
pure: nothing is cached between calls, and identical inputs give identical
outputs.

## The `Telemetry` trait

Because this is an independent library, it doesn't know the types the
measurements arrive in.  Any type implementing the [`Telemetry`] trait can be
turned into a snapshot with [`MeasurementSnapshot::from_telemetry`].  Series of
instantaneous readings can be summed into a snapshot for a time window with an
[`EnergyAccumulator`].

## Bad data

Negative or non-finite measurements are replaced with 0 and logged as
warnings, and a snapshot without any flow gives a model and a layout for which
[`has_flow`][DiagramModel::has_flow] returns false.  Errors are only returned
for invalid configurations, lookups of nodes that aren't in the diagram, and
explicit conservation checks with
[`validate_conservation`][FlowDecomposition::validate_conservation].
*/

mod accumulator;
pub use accumulator::EnergyAccumulator;

mod config;
pub use config::{DecompositionConfig, LayoutConfig};

mod decomposition;
pub use decomposition::{DecompositionMode, FlowDecomposition, FlowEdge, NodeTotals};

mod diagram;
pub use diagram::{iterators, DiagramModel, FlowNode};

mod error;
pub use error::Error;

mod flow_node;
pub use flow_node::{FlowNodeId, Side};

pub mod geometry;

mod layout;
pub use layout::{DiagramLayout, LayoutEngine, LinkLayout, NodeLayout, Ribbon};

mod snapshot;
pub use snapshot::{BatteryFlow, MeasurementSnapshot};

mod telemetry;
pub use telemetry::Telemetry;
