// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The output-share policy for aggregated data.

use crate::{FlowNodeId, Side};

use super::{FlowMatrix, NodeTotals};

/// Splits every source across all sinks by each sink's share of the total
/// output.  Every edge is zero when either side total is within `epsilon`.
pub(super) fn allocate(totals: &NodeTotals, epsilon: f64) -> FlowMatrix {
    let total_input = totals.side_total(Side::Source);
    let total_output = totals.side_total(Side::Sink);
    if total_input <= epsilon || total_output <= epsilon {
        return [[0.0; 3]; 3];
    }

    let ratios = FlowNodeId::SINKS.map(|sink| totals.get(sink) / total_output);
    FlowNodeId::SOURCES.map(|source| {
        let value = totals.get(source);
        ratios.map(|ratio| value * ratio)
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use crate::{
        DecompositionConfig, DecompositionMode, Error, FlowDecomposition, FlowNodeId,
        MeasurementSnapshot,
    };

    use FlowNodeId::*;

    fn decompose(snapshot: MeasurementSnapshot) -> FlowDecomposition {
        FlowDecomposition::new(
            &snapshot,
            DecompositionMode::Proportional,
            &DecompositionConfig::default(),
        )
    }

    #[test]
    fn test_single_source() -> Result<(), Error> {
        let decomposition = decompose(MeasurementSnapshot::new(10.0, 2.0, 0.0, 0.0, 2.0, 6.0));

        assert_approx_eq!(f64, decomposition.flow(Solar, Load), 6.0, epsilon = 1e-9);
        assert_approx_eq!(f64, decomposition.flow(Solar, BatteryIn), 2.0, epsilon = 1e-9);
        assert_approx_eq!(f64, decomposition.flow(Solar, GridOut), 2.0, epsilon = 1e-9);
        assert_eq!(decomposition.outgoing_sum(GridIn), 0.0);
        assert_eq!(decomposition.outgoing_sum(BatteryOut), 0.0);

        decomposition.validate_conservation(1e-6)
    }

    #[test]
    fn test_daily_totals() -> Result<(), Error> {
        // A day where the battery both charged and discharged, and the grid
        // was both imported from and exported to.
        let decomposition = decompose(MeasurementSnapshot::new(20.0, 6.0, 5.0, 3.0, 8.0, 14.0));

        // 28 kWh in, 28 kWh out: load is 50% of the output.
        assert_approx_eq!(f64, decomposition.flow(Solar, Load), 10.0, epsilon = 1e-9);
        assert_approx_eq!(f64, decomposition.flow(BatteryOut, Load), 2.5, epsilon = 1e-9);
        assert_approx_eq!(f64, decomposition.flow(GridIn, Load), 1.5, epsilon = 1e-9);
        assert_approx_eq!(f64, decomposition.flow(BatteryOut, BatteryIn), 5.0 * 6.0 / 28.0, epsilon = 1e-9);
        assert_approx_eq!(f64, decomposition.flow(GridIn, GridOut), 3.0 * 8.0 / 28.0, epsilon = 1e-9);

        decomposition.validate_conservation(1e-6)
    }

    #[test]
    fn test_degenerate_totals() {
        // Generation without any recorded consumption.
        let decomposition = decompose(MeasurementSnapshot::new(3.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        assert!(decomposition.edges().iter().all(|e| e.value() == 0.0));

        let decomposition = decompose(MeasurementSnapshot::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0005));
        assert!(decomposition.edges().iter().all(|e| e.value() == 0.0));
    }
}
