// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Placement of the nodes in their columns.

use crate::geometry::{Rect, Size};
use crate::{DiagramModel, LayoutConfig, Side};

use super::NodeLayout;

/// Node width for the given canvas width, within the configured bounds.
pub(super) fn node_width(config: &LayoutConfig, canvas: Size) -> f64 {
    (canvas.width() * config.node_width_fraction)
        .max(config.min_node_width)
        .min(config.max_node_width)
}

/// Vertical space the nodes of one column are scaled against.
pub(super) fn available_height(config: &LayoutConfig, canvas: Size) -> f64 {
    (canvas.shrink(config.margins).height() - config.vertical_reserve).max(0.0)
}

/// Stacks the nodes of each column top to bottom, starting at the top
/// margin, with heights proportional to their share of the column total.
pub(super) fn place_nodes(
    config: &LayoutConfig,
    model: &DiagramModel,
    canvas: Size,
) -> Vec<NodeLayout> {
    let width = node_width(config, canvas);
    let available = available_height(config, canvas);

    let mut nodes = Vec::new();
    for side in [Side::Source, Side::Sink] {
        let x = match side {
            Side::Source => config.margins.left(),
            Side::Sink => canvas.width() - config.margins.right() - width,
        };
        let column_total: f64 = model.column(side).map(|n| n.value()).sum();

        let mut y = config.margins.top();
        for node in model.column(side) {
            let share = if column_total > 0.0 {
                node.value() / column_total
            } else {
                0.0
            };
            let height = (share * available * config.column_fill)
                .max(config.min_node_height)
                .min(config.max_node_height);

            nodes.push(NodeLayout {
                id: node.id(),
                value: node.value(),
                percentage: node.percentage(),
                rect: Rect::new(x, y, width, height),
            });
            y += height + config.node_gap;
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::diagram::test_utils::BalancedSnapshot;
    use crate::{DecompositionConfig, DecompositionMode, Error, FlowNodeId};

    fn place(model: &DiagramModel, canvas: Size) -> Vec<NodeLayout> {
        place_nodes(&LayoutConfig::default(), model, canvas)
    }

    #[test]
    fn test_node_width() {
        let config = LayoutConfig::default();
        assert_eq!(node_width(&config, Size::new(600.0, 420.0)), 72.0);
        assert_eq!(node_width(&config, Size::new(100.0, 420.0)), 60.0);
        assert_eq!(node_width(&config, Size::new(2000.0, 420.0)), 90.0);
    }

    #[test]
    fn test_available_height() {
        let config = LayoutConfig::default();
        assert_eq!(available_height(&config, Size::new(600.0, 420.0)), 360.0);
        assert_eq!(available_height(&config, Size::new(600.0, 40.0)), 0.0);
    }

    #[test]
    fn test_columns() -> Result<(), Error> {
        // Solar feeds the load, the grid feeds the rest of the load and the
        // battery.  Sources: Solar 4, Grid In 2.  Sinks: Battery In 1, Load 5.
        let snapshot = BalancedSnapshot::new()
            .solar(4.0)
            .load(5.0)
            .battery(1.0)
            .build();
        let model = DiagramModel::new(
            &snapshot,
            DecompositionMode::Priority,
            &DecompositionConfig::default(),
        );
        let nodes = place(&model, Size::new(600.0, 420.0));

        assert!(nodes.iter().map(|n| n.id()).eq([
            FlowNodeId::Solar,
            FlowNodeId::GridIn,
            FlowNodeId::BatteryIn,
            FlowNodeId::Load,
        ]));

        // 360 px available, 80% fill: Solar 4/6 -> 192, clamped to 120.
        let solar = nodes[0].rect();
        assert_eq!(solar, Rect::new(20.0, 15.0, 72.0, 120.0));
        // Grid In 2/6 -> 96, placed below Solar with a 4 px gap.
        let grid_in = nodes[1].rect();
        assert_eq!(grid_in.y(), 139.0);
        assert_approx_eq!(f64, grid_in.height(), 96.0, ulps = 4);

        // Battery In 1/6 -> 48, raised to the 50 px minimum.
        let battery_in = nodes[2].rect();
        assert_eq!(battery_in, Rect::new(508.0, 15.0, 72.0, 50.0));
        let load = nodes[3].rect();
        assert_eq!(load.y(), 69.0);
        assert_eq!(load.height(), 120.0);

        Ok(())
    }

    #[test]
    fn test_tiny_canvas() {
        let snapshot = BalancedSnapshot::new().solar(1.0).load(3.0).build();
        let model = DiagramModel::new(
            &snapshot,
            DecompositionMode::Priority,
            &DecompositionConfig::default(),
        );
        let nodes = place(&model, Size::new(10.0, 10.0));

        // Everything collapses to the minimum size, and the sink column ends
        // up left of the canvas.
        assert!(nodes.iter().all(|n| n.rect().width() == 60.0));
        assert!(nodes.iter().all(|n| n.rect().height() == 50.0));
        assert_eq!(nodes[2].rect().x(), -70.0);
    }
}
