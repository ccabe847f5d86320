// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The fixed-precedence policy for instantaneous data.
//!
//! Solar is preferred for the load, then for charging the battery, and only
//! the remainder is exported.  Battery discharge only ever serves the load
//! left over by solar, and grid import serves the load left over by both,
//! charging the battery with the rest.  This is one valid allocation among
//! many: the measurements alone can't tell which source fed which sink.
//!
//! Battery discharge in excess of the remaining load is not routed anywhere,
//! so a battery that discharges while the home exports shows less outflow
//! than it measured.

use crate::FlowNodeId;

use super::{FlowMatrix, NodeTotals};

pub(super) fn allocate(totals: &NodeTotals) -> FlowMatrix {
    let solar = totals.get(FlowNodeId::Solar);
    let battery_out = totals.get(FlowNodeId::BatteryOut);
    let grid_in = totals.get(FlowNodeId::GridIn);
    let battery_in = totals.get(FlowNodeId::BatteryIn);
    let load = totals.get(FlowNodeId::Load);

    let solar_to_load = solar.min(load);
    let solar_to_battery = (solar - solar_to_load).max(0.0).min(battery_in);
    let solar_to_grid = (solar - solar_to_load - solar_to_battery).max(0.0);

    let remaining_load = (load - solar_to_load).max(0.0);
    let battery_to_load = battery_out.min(remaining_load);

    let remaining_load = (remaining_load - battery_to_load).max(0.0);
    let grid_to_load = grid_in.min(remaining_load);
    let grid_to_battery = (grid_in - grid_to_load).max(0.0);

    // Columns: Battery In, Load, Grid Out.
    [
        [solar_to_battery, solar_to_load, solar_to_grid],
        [0.0, battery_to_load, 0.0],
        [grid_to_battery, grid_to_load, 0.0],
    ]
}
