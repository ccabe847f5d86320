// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the trait that needs to be implemented by the types
//! that carry measurements into the engine.

/**
This trait needs to be implemented by the type that represents a set of
measurements for one time window.

Read more about why this is necessary [here][crate#the-telemetry-trait].

All values are expected in one unit per call: kW for instantaneous readings,
kWh for totals aggregated over a time window.  Negative or non-finite values
are tolerated and clamped to zero when converted into a
[`MeasurementSnapshot`][crate::MeasurementSnapshot].

<details>
<summary>Example implementation for an inverter poller:</summary>

```ignore
struct InverterReading {
    pv_w: u32,
    load_w: i32,
    grid_w: i32, // positive = export
}

impl energy_flow_diagram::Telemetry for InverterReading {
    fn solar(&self) -> f64 {
        self.pv_w as f64 / 1000.0
    }

    fn battery_charge(&self) -> f64 {
        self.battery_net().unwrap_or_default().max(0.0)
    }

    fn battery_discharge(&self) -> f64 {
        (-self.battery_net().unwrap_or_default()).max(0.0)
    }

    fn grid_import(&self) -> f64 {
        (-self.grid_w as f64 / 1000.0).max(0.0)
    }

    fn grid_export(&self) -> f64 {
        (self.grid_w as f64 / 1000.0).max(0.0)
    }

    fn load(&self) -> f64 {
        self.load_w as f64 / 1000.0
    }

    fn battery_net(&self) -> Option<f64> {
        Some((self.pv_w as f64 - self.load_w as f64 - self.grid_w as f64) / 1000.0)
    }
}
```

</details>
*/
pub trait Telemetry {
    /// Returns the solar generation.
    fn solar(&self) -> f64;
    /// Returns the power or energy flowing into the battery.
    fn battery_charge(&self) -> f64;
    /// Returns the power or energy flowing out of the battery.
    fn battery_discharge(&self) -> f64;
    /// Returns the power or energy imported from the grid.
    fn grid_import(&self) -> f64;
    /// Returns the power or energy exported to the grid.
    fn grid_export(&self) -> f64;
    /// Returns the household consumption.
    fn load(&self) -> f64;
    /// Returns the signed battery power, positive when charging, if the
    /// source reports one.
    fn battery_net(&self) -> Option<f64> {
        None
    }
}
