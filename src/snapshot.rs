// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The measurement snapshot that is fed into the flow decomposition.

use crate::Telemetry;

/// The six aggregate measurements of one time window, plus an optional
/// signed battery power.
///
/// Values are in kW for instantaneous readings or kWh for aggregated ones;
/// the engine is unit-agnostic.  All scalars are sanitized on construction:
/// negative and non-finite values become `0.0`, so a single bad telemetry
/// field can never produce negative flows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawSnapshot")
)]
pub struct MeasurementSnapshot {
    solar: f64,
    battery_charge: f64,
    battery_discharge: f64,
    grid_import: f64,
    grid_export: f64,
    load: f64,
    battery_net: Option<f64>,
}

/// The battery charge and discharge after direction resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryFlow {
    /// Energy flowing into the battery (the `Battery In` sink).
    pub charge: f64,
    /// Energy flowing out of the battery (the `Battery Out` source).
    pub discharge: f64,
}

fn sanitize(field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    tracing::warn!("Clamping {field} measurement {value} to 0.");
    0.0
}

impl MeasurementSnapshot {
    /// Creates a new snapshot from the six aggregate measurements.
    pub fn new(
        solar: f64,
        battery_charge: f64,
        battery_discharge: f64,
        grid_import: f64,
        grid_export: f64,
        load: f64,
    ) -> Self {
        Self {
            solar: sanitize("solar", solar),
            battery_charge: sanitize("battery_charge", battery_charge),
            battery_discharge: sanitize("battery_discharge", battery_discharge),
            grid_import: sanitize("grid_import", grid_import),
            grid_export: sanitize("grid_export", grid_export),
            load: sanitize("load", load),
            battery_net: None,
        }
    }

    /// Sets the signed battery power: positive when charging, negative when
    /// discharging.
    ///
    /// When its magnitude exceeds the decomposition epsilon, it overrides the
    /// raw charge and discharge scalars.  A non-finite value is ignored.
    pub fn with_battery_net(mut self, battery_net: f64) -> Self {
        if battery_net.is_finite() {
            self.battery_net = Some(battery_net);
        } else {
            tracing::warn!("Ignoring non-finite battery_net measurement {battery_net}.");
            self.battery_net = None;
        }
        self
    }

    /// Creates a snapshot from any type implementing [`Telemetry`].
    pub fn from_telemetry(telemetry: &impl Telemetry) -> Self {
        let snapshot = Self::new(
            telemetry.solar(),
            telemetry.battery_charge(),
            telemetry.battery_discharge(),
            telemetry.grid_import(),
            telemetry.grid_export(),
            telemetry.load(),
        );
        match telemetry.battery_net() {
            Some(net) => snapshot.with_battery_net(net),
            None => snapshot,
        }
    }

    /// Creates a snapshot from the three quantities an inverter meters
    /// directly, deriving the battery power from the energy balance.
    ///
    /// `grid_net` is positive when exporting and negative when importing.
    pub fn from_meter_readings(solar: f64, load: f64, grid_net: f64) -> Self {
        let solar = sanitize("solar", solar);
        let load = sanitize("load", load);
        let grid_net = if grid_net.is_finite() {
            grid_net
        } else {
            tracing::warn!("Clamping grid_net measurement {grid_net} to 0.");
            0.0
        };

        let battery_net = solar - load - grid_net;
        Self::new(
            solar,
            battery_net.max(0.0),
            (-battery_net).max(0.0),
            (-grid_net).max(0.0),
            grid_net.max(0.0),
            load,
        )
        .with_battery_net(battery_net)
    }

    pub fn solar(&self) -> f64 {
        self.solar
    }

    pub fn battery_charge(&self) -> f64 {
        self.battery_charge
    }

    pub fn battery_discharge(&self) -> f64 {
        self.battery_discharge
    }

    pub fn grid_import(&self) -> f64 {
        self.grid_import
    }

    pub fn grid_export(&self) -> f64 {
        self.grid_export
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn battery_net(&self) -> Option<f64> {
        self.battery_net
    }

    /// Resolves the direction of the battery flow.
    ///
    /// A `battery_net` larger than `epsilon` in magnitude decides the
    /// direction alone: all of it is routed to charging when positive, or to
    /// discharging when negative.  Otherwise the raw charge and discharge
    /// totals are kept as they are, which for aggregated data may mean both
    /// are non-zero.
    pub fn battery_flow(&self, epsilon: f64) -> BatteryFlow {
        match self.battery_net {
            Some(net) if net.abs() > epsilon => {
                if net > 0.0 {
                    BatteryFlow {
                        charge: net,
                        discharge: 0.0,
                    }
                } else {
                    BatteryFlow {
                        charge: 0.0,
                        discharge: -net,
                    }
                }
            }
            _ => BatteryFlow {
                charge: self.battery_charge,
                discharge: self.battery_discharge,
            },
        }
    }

    /// Total energy entering the home: solar, battery discharge and grid
    /// import.
    pub fn energy_in(&self) -> f64 {
        self.solar + self.battery_discharge + self.grid_import
    }

    /// Total energy leaving towards consumers: load, battery charge and grid
    /// export.
    pub fn energy_out(&self) -> f64 {
        self.load + self.battery_charge + self.grid_export
    }

    /// Difference between [`energy_in`][Self::energy_in] and
    /// [`energy_out`][Self::energy_out].  Zero for a balanced snapshot.
    pub fn imbalance(&self) -> f64 {
        self.energy_in() - self.energy_out()
    }
}

impl Telemetry for MeasurementSnapshot {
    fn solar(&self) -> f64 {
        self.solar
    }

    fn battery_charge(&self) -> f64 {
        self.battery_charge
    }

    fn battery_discharge(&self) -> f64 {
        self.battery_discharge
    }

    fn grid_import(&self) -> f64 {
        self.grid_import
    }

    fn grid_export(&self) -> f64 {
        self.grid_export
    }

    fn load(&self) -> f64 {
        self.load
    }

    fn battery_net(&self) -> Option<f64> {
        self.battery_net
    }
}

/// Unchecked field values, sanitized through [`MeasurementSnapshot::new`]
/// on deserialization.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default)]
struct RawSnapshot {
    solar: f64,
    battery_charge: f64,
    battery_discharge: f64,
    grid_import: f64,
    grid_export: f64,
    load: f64,
    battery_net: Option<f64>,
}

#[cfg(feature = "serde")]
impl Default for RawSnapshot {
    fn default() -> Self {
        Self {
            solar: 0.0,
            battery_charge: 0.0,
            battery_discharge: 0.0,
            grid_import: 0.0,
            grid_export: 0.0,
            load: 0.0,
            battery_net: None,
        }
    }
}

#[cfg(feature = "serde")]
impl From<RawSnapshot> for MeasurementSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        let snapshot = Self::new(
            raw.solar,
            raw.battery_charge,
            raw.battery_discharge,
            raw.grid_import,
            raw.grid_export,
            raw.load,
        );
        match raw.battery_net {
            Some(net) => snapshot.with_battery_net(net),
            None => snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        let snapshot = MeasurementSnapshot::new(-1.0, f64::NAN, 2.0, f64::INFINITY, 0.5, -0.0);
        assert_eq!(snapshot.solar(), 0.0);
        assert_eq!(snapshot.battery_charge(), 0.0);
        assert_eq!(snapshot.battery_discharge(), 2.0);
        assert_eq!(snapshot.grid_import(), 0.0);
        assert_eq!(snapshot.grid_export(), 0.5);
        assert!(snapshot.load() >= 0.0);

        let snapshot = snapshot.with_battery_net(f64::NEG_INFINITY);
        assert_eq!(snapshot.battery_net(), None);
    }

    #[test]
    fn test_battery_flow_from_net() {
        // A net value overrides the raw scalars.
        let snapshot = MeasurementSnapshot::new(0.0, 0.2, 0.1, 0.0, 0.0, 0.0)
            .with_battery_net(-1.5);
        assert_eq!(
            snapshot.battery_flow(0.001),
            BatteryFlow {
                charge: 0.0,
                discharge: 1.5
            }
        );

        let snapshot = snapshot.with_battery_net(2.5);
        assert_eq!(
            snapshot.battery_flow(0.001),
            BatteryFlow {
                charge: 2.5,
                discharge: 0.0
            }
        );
    }

    #[test]
    fn test_battery_flow_without_net() {
        // Aggregated data keeps both totals.
        let snapshot = MeasurementSnapshot::new(0.0, 3.0, 4.0, 0.0, 0.0, 0.0);
        assert_eq!(
            snapshot.battery_flow(0.001),
            BatteryFlow {
                charge: 3.0,
                discharge: 4.0
            }
        );

        // A net value within epsilon doesn't decide the direction.
        let snapshot = snapshot.with_battery_net(0.0005);
        assert_eq!(
            snapshot.battery_flow(0.001),
            BatteryFlow {
                charge: 3.0,
                discharge: 4.0
            }
        );
    }

    #[test]
    fn test_from_meter_readings() {
        // 5 kW PV, 2 kW load, 1 kW export => 2 kW charging.
        let snapshot = MeasurementSnapshot::from_meter_readings(5.0, 2.0, 1.0);
        assert_eq!(snapshot.battery_net(), Some(2.0));
        assert_eq!(snapshot.battery_charge(), 2.0);
        assert_eq!(snapshot.battery_discharge(), 0.0);
        assert_eq!(snapshot.grid_export(), 1.0);
        assert_eq!(snapshot.grid_import(), 0.0);
        assert_eq!(snapshot.imbalance(), 0.0);

        // No PV, 3 kW load, 1 kW import => 2 kW discharging.
        let snapshot = MeasurementSnapshot::from_meter_readings(0.0, 3.0, -1.0);
        assert_eq!(snapshot.battery_net(), Some(-2.0));
        assert_eq!(snapshot.battery_discharge(), 2.0);
        assert_eq!(snapshot.grid_import(), 1.0);
        assert_eq!(snapshot.imbalance(), 0.0);
    }

    #[test]
    fn test_balance() {
        let snapshot = MeasurementSnapshot::new(10.0, 2.0, 0.0, 0.0, 2.0, 6.0);
        assert_eq!(snapshot.energy_in(), 10.0);
        assert_eq!(snapshot.energy_out(), 10.0);
        assert_eq!(snapshot.imbalance(), 0.0);

        let snapshot = MeasurementSnapshot::new(1.0, 0.0, 0.0, 0.0, 0.0, 3.0);
        assert_eq!(snapshot.imbalance(), -2.0);
    }

    struct Reading {
        pv: f64,
        load: f64,
    }

    impl Telemetry for Reading {
        fn solar(&self) -> f64 {
            self.pv
        }
        fn battery_charge(&self) -> f64 {
            0.0
        }
        fn battery_discharge(&self) -> f64 {
            0.0
        }
        fn grid_import(&self) -> f64 {
            (self.load - self.pv).max(0.0)
        }
        fn grid_export(&self) -> f64 {
            (self.pv - self.load).max(0.0)
        }
        fn load(&self) -> f64 {
            self.load
        }
    }

    #[test]
    fn test_from_telemetry() {
        let snapshot = MeasurementSnapshot::from_telemetry(&Reading { pv: 1.0, load: 4.0 });
        assert_eq!(snapshot, MeasurementSnapshot::new(1.0, 0.0, 0.0, 3.0, 0.0, 4.0));
        assert_eq!(snapshot.battery_net(), None);

        let with_net = MeasurementSnapshot::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).with_battery_net(1.0);
        assert_eq!(MeasurementSnapshot::from_telemetry(&with_net), with_net);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_sanitizes() {
        let snapshot: MeasurementSnapshot =
            serde_json::from_str(r#"{"solar": -3.0, "load": 2.0, "battery_net": -1.5}"#)
                .unwrap();
        assert_eq!(snapshot.solar(), 0.0);
        assert_eq!(snapshot.load(), 2.0);
        assert_eq!(snapshot.battery_net(), Some(-1.5));
    }
}
