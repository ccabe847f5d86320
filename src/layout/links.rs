// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Routing of the links between the columns.

use crate::geometry::{Point, Rect};
use crate::{DiagramModel, FlowNodeId, LayoutConfig};

use super::{LinkLayout, NodeLayout};

/// Running state of one node while its links are stacked.
#[derive(Clone, Copy, Default)]
struct Port {
    rect: Rect,
    /// Sum of the link values attached on this side of the node.
    total: f64,
    /// Space already taken by the links placed so far.
    offset: f64,
}

impl Port {
    /// Returns the width of a link end carrying `value`, and the y-coordinate
    /// of its center, and reserves the space for it.
    fn place(&mut self, config: &LayoutConfig, value: f64) -> (f64, f64) {
        let usable = (self.rect.height() - 2.0 * config.node_padding).max(0.0);
        let width = (value / self.total * usable).max(config.min_link_width);
        let y = self.rect.y() + config.node_padding + self.offset + width / 2.0;
        self.offset += width;
        (width, y)
    }
}

/// Computes the geometry of every link of the model.
///
/// Links leaving one node are stacked down its right edge in target order,
/// and links entering one node down its left edge in source order, so that
/// they never cross inside a node.
pub(super) fn route_links(
    config: &LayoutConfig,
    model: &DiagramModel,
    nodes: &[NodeLayout],
) -> Vec<LinkLayout> {
    let mut outgoing = [Port::default(); FlowNodeId::ALL.len()];
    let mut incoming = [Port::default(); FlowNodeId::ALL.len()];
    for node in nodes {
        outgoing[node.id.index()].rect = node.rect;
        incoming[node.id.index()].rect = node.rect;
    }
    for link in model.links() {
        outgoing[link.source().index()].total += link.value();
        incoming[link.target().index()].total += link.value();
    }

    model
        .links()
        .map(|link| {
            let source = &mut outgoing[link.source().index()];
            let x0 = source.rect.right();
            let (source_width, y0) = source.place(config, link.value());

            let target = &mut incoming[link.target().index()];
            let x1 = target.rect.x();
            let (target_width, y1) = target.place(config, link.value());

            let dx = x1 - x0;
            LinkLayout {
                source: link.source(),
                target: link.target(),
                value: link.value(),
                start: Point::new(x0, y0),
                end: Point::new(x1, y1),
                control_x: [x0 + dx * config.curvature, x1 - dx * config.curvature],
                source_width,
                target_width,
            }
        })
        .collect()
}
