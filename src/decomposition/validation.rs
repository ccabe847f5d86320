// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Methods for checking the conservation invariants of a
//! [`FlowDecomposition`].

use crate::{Error, FlowNodeId};

use super::FlowDecomposition;

impl FlowDecomposition {
    /// Checks that no edge is negative, that the edges leaving every source
    /// sum up to the source's value, and that the edges entering every sink
    /// sum up to the sink's value, all within `tolerance`.
    ///
    /// Sink conservation only holds for balanced snapshots, and the priority
    /// policy leaves battery discharge beyond the remaining load unrouted, so
    /// an error here describes the input data or the policy rather than a
    /// fault in the decomposition.
    pub fn validate_conservation(&self, tolerance: f64) -> Result<(), Error> {
        if let Some(edge) = self.edges.iter().find(|e| !(e.value() >= 0.0)) {
            return Err(Error::conservation_violation(format!(
                "{} -> {} has a negative value: {}.",
                edge.source(),
                edge.target(),
                edge.value()
            )));
        }

        for id in FlowNodeId::ALL {
            let (direction, sum) = if id.is_source() {
                ("outgoing", self.outgoing_sum(id))
            } else {
                ("incoming", self.incoming_sum(id))
            };
            let expected = self.totals.get(id);
            if (sum - expected).abs() > tolerance {
                return Err(Error::conservation_violation(format!(
                    "{id}: {direction} flows sum to {sum}, expected {expected}."
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        DecompositionConfig, DecompositionMode, Error, FlowDecomposition, MeasurementSnapshot,
    };

    #[test]
    fn test_balanced_snapshots() -> Result<(), Error> {
        let config = DecompositionConfig::default();
        let snapshots = [
            MeasurementSnapshot::new(5.0, 2.0, 0.0, 0.0, 0.0, 3.0),
            MeasurementSnapshot::new(0.0, 0.0, 1.0, 2.0, 0.0, 3.0),
            MeasurementSnapshot::new(6.0, 0.0, 0.0, 0.0, 2.5, 3.5),
            MeasurementSnapshot::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        ];
        for snapshot in snapshots {
            for mode in [DecompositionMode::Priority, DecompositionMode::Proportional] {
                FlowDecomposition::new(&snapshot, mode, &config).validate_conservation(1e-9)?;
            }
        }
        Ok(())
    }

    #[test]
    fn test_unbalanced_snapshot() {
        // 4 kW solar but only 3 kW accounted for on the sink side.
        let snapshot = MeasurementSnapshot::new(4.0, 0.0, 0.0, 0.0, 0.0, 3.0);
        let decomposition = FlowDecomposition::new(
            &snapshot,
            DecompositionMode::Proportional,
            &DecompositionConfig::default(),
        );
        assert_eq!(
            decomposition.validate_conservation(1e-6),
            Err(Error::conservation_violation(
                "Load: incoming flows sum to 4, expected 3."
            ))
        );
    }
}
