// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Aggregation of instantaneous snapshots into energy totals.

use crate::{DecompositionConfig, MeasurementSnapshot};

/// Integrates a series of instantaneous snapshots (kW) into one aggregated
/// snapshot (kWh), for use with
/// [`DecompositionMode::Proportional`][crate::DecompositionMode::Proportional].
///
/// The accumulator is owned by the caller and mutated explicitly; the engine
/// itself keeps no state between calls.
#[derive(Debug, Clone, Default)]
pub struct EnergyAccumulator {
    config: DecompositionConfig,
    solar: f64,
    battery_charge: f64,
    battery_discharge: f64,
    grid_import: f64,
    grid_export: f64,
    load: f64,
    sample_count: usize,
}

impl EnergyAccumulator {
    /// Creates an empty accumulator.
    ///
    /// The `epsilon` of the given config is used to resolve the battery
    /// direction of each sample.
    pub fn new(config: DecompositionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Adds an instantaneous sample that was valid for `interval_hours`.
    ///
    /// Samples with a signed battery power contribute to exactly one of the
    /// battery totals.  Non-positive or non-finite intervals are ignored.
    pub fn add_sample(&mut self, sample: &MeasurementSnapshot, interval_hours: f64) {
        if !interval_hours.is_finite() || interval_hours <= 0.0 {
            tracing::warn!("Ignoring sample with invalid interval of {interval_hours} hours.");
            return;
        }
        let battery = sample.battery_flow(self.config.epsilon);
        self.solar += sample.solar() * interval_hours;
        self.battery_charge += battery.charge * interval_hours;
        self.battery_discharge += battery.discharge * interval_hours;
        self.grid_import += sample.grid_import() * interval_hours;
        self.grid_export += sample.grid_export() * interval_hours;
        self.load += sample.load() * interval_hours;
        self.sample_count += 1;
    }

    /// Adds totals that are already aggregated, like daily energy figures.
    pub fn add_totals(&mut self, totals: &MeasurementSnapshot) {
        self.add_sample(totals, 1.0);
    }

    /// Returns the number of samples added since creation or the last reset.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Returns the aggregated snapshot.
    ///
    /// The result never carries a `battery_net`, so both battery totals stay
    /// distinct during decomposition.
    pub fn snapshot(&self) -> MeasurementSnapshot {
        MeasurementSnapshot::new(
            self.solar,
            self.battery_charge,
            self.battery_discharge,
            self.grid_import,
            self.grid_export,
            self.load,
        )
    }

    /// Clears all totals, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}
