// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Two-column layout of a [`DiagramModel`].
//!
//! Sources are stacked in the left column and sinks in the right one, each
//! node sized by its share of its column.  Links are cubic curves between the
//! columns whose width encodes the flow, computed separately at each end so
//! that a ribbon tapers when a flow is a larger share of its source's output
//! than of its target's input, or the other way around.

mod columns;
mod links;

use crate::geometry::{CubicBezier, Point, Rect, Size};
use crate::{
    DecompositionConfig, DecompositionMode, DiagramModel, Error, FlowNodeId, LayoutConfig,
    MeasurementSnapshot,
};

/// The geometry of one diagram node.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeLayout {
    id: FlowNodeId,
    value: f64,
    percentage: f64,
    rect: Rect,
}

impl NodeLayout {
    pub fn id(&self) -> FlowNodeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// The geometry of one diagram link.
///
/// `start` and `end` are the centers of the link ends on the right edge of
/// the source node and the left edge of the target node.  The control points
/// of the curve share the y-coordinate of the end they belong to, so only
/// their x-coordinates are stored.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkLayout {
    source: FlowNodeId,
    target: FlowNodeId,
    value: f64,
    start: Point,
    end: Point,
    control_x: [f64; 2],
    source_width: f64,
    target_width: f64,
}

/// The outline of a tapered link: the curves along its upper and lower
/// borders, both running from source to target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ribbon {
    pub upper: CubicBezier,
    pub lower: CubicBezier,
}

impl LinkLayout {
    pub fn source(&self) -> FlowNodeId {
        self.source
    }

    pub fn target(&self) -> FlowNodeId {
        self.target
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn control_x(&self) -> [f64; 2] {
        self.control_x
    }

    /// Width of the link where it leaves the source node.
    pub fn source_width(&self) -> f64 {
        self.source_width
    }

    /// Width of the link where it enters the target node.
    pub fn target_width(&self) -> f64 {
        self.target_width
    }

    pub fn control_points(&self) -> (Point, Point) {
        (
            Point::new(self.control_x[0], self.start.y()),
            Point::new(self.control_x[1], self.end.y()),
        )
    }

    /// The curve through the middle of the link.
    pub fn centerline(&self) -> CubicBezier {
        let (c1, c2) = self.control_points();
        CubicBezier::new(self.start, c1, c2, self.end)
    }

    pub fn ribbon(&self) -> Ribbon {
        let border = |offset: f64| {
            let y0 = self.start.y() + offset * self.source_width / 2.0;
            let y1 = self.end.y() + offset * self.target_width / 2.0;
            CubicBezier::new(
                Point::new(self.start.x(), y0),
                Point::new(self.control_x[0], y0),
                Point::new(self.control_x[1], y1),
                Point::new(self.end.x(), y1),
            )
        };
        Ribbon {
            upper: border(-1.0),
            lower: border(1.0),
        }
    }
}

/// The geometry of a whole diagram, for one canvas size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagramLayout {
    canvas: Size,
    has_flow: bool,
    nodes: Vec<NodeLayout>,
    links: Vec<LinkLayout>,
}

impl DiagramLayout {
    /// The canvas size the layout was computed for, after sanitization.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Returns false for the "no flow" state, in which there are no nodes and
    /// no links to draw.
    pub fn has_flow(&self) -> bool {
        self.has_flow
    }

    /// Node geometry in column order, sources first.
    pub fn nodes(&self) -> &[NodeLayout] {
        &self.nodes
    }

    /// Link geometry in the order of the model's links.
    pub fn links(&self) -> &[LinkLayout] {
        &self.links
    }

    pub fn node(&self, id: FlowNodeId) -> Result<&NodeLayout, Error> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::node_not_found(format!("Node {} not found.", id)))
    }
}

/// Computes [`DiagramLayout`]s from [`DiagramModel`]s.
///
/// The engine holds only its configuration.  Every call recomputes the
/// geometry from scratch, and identical inputs give identical outputs.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Creates a new engine after validating the given configuration.
    pub fn try_new(config: LayoutConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the model on a canvas of the given size.
    ///
    /// A canvas too small for the configured node sizes gives clamped and
    /// possibly overlapping geometry rather than an error.
    pub fn layout(&self, model: &DiagramModel, canvas: Size) -> DiagramLayout {
        let canvas = sanitize_canvas(canvas);

        if !model.has_flow() {
            tracing::debug!("Nothing to lay out, model has no flow.");
            return DiagramLayout {
                canvas,
                has_flow: false,
                nodes: Vec::new(),
                links: Vec::new(),
            };
        }

        let nodes = columns::place_nodes(&self.config, model, canvas);
        let links = links::route_links(&self.config, model, &nodes);

        tracing::trace!(
            "Laid out {} nodes and {} links on a {}x{} canvas.",
            nodes.len(),
            links.len(),
            canvas.width(),
            canvas.height()
        );

        DiagramLayout {
            canvas,
            has_flow: true,
            nodes,
            links,
        }
    }

    /// Decomposes the snapshot, assembles the model and lays it out.
    pub fn render(
        &self,
        snapshot: &MeasurementSnapshot,
        mode: DecompositionMode,
        config: &DecompositionConfig,
        canvas: Size,
    ) -> DiagramLayout {
        self.layout(&DiagramModel::new(snapshot, mode, config), canvas)
    }
}

fn sanitize_canvas(canvas: Size) -> Size {
    let clean = |name: &str, value: f64| {
        if value.is_finite() && value >= 0.0 {
            value
        } else {
            tracing::warn!("Invalid canvas {name}: {value}, using 0.");
            0.0
        }
    };
    Size::new(
        clean("width", canvas.width()),
        clean("height", canvas.height()),
    )
}
