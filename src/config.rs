// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for the flow decomposition
//! and the diagram layout.

use crate::geometry::Insets;
use crate::Error;

/// Configuration options for the flow decomposition and the `DiagramModel`
/// assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct DecompositionConfig {
    /// Minimum flow value that is materialized as a link.  Flows below it
    /// don't exist in the diagram.  It is also the threshold above which a
    /// signed battery power decides the battery direction, and below which
    /// side totals count as zero in proportional mode.
    pub epsilon: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self { epsilon: 0.001 }
    }
}

impl DecompositionConfig {
    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::invalid_config(format!(
                "epsilon must be a non-negative finite number, got {}.",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Configuration options for the `LayoutEngine`.
///
/// The defaults reproduce the dashboard the layout was designed for: a
/// 420 px high canvas with three nodes per column.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Space kept free around the two columns.
    pub margins: Insets,

    /// Node width as a fraction of the canvas width, before clamping.
    pub node_width_fraction: f64,
    pub min_node_width: f64,
    pub max_node_width: f64,

    pub min_node_height: f64,
    pub max_node_height: f64,

    /// Vertical space subtracted from the inner canvas height, reserved for
    /// the gaps between nodes.
    pub vertical_reserve: f64,

    /// Fraction of the available column height that a node holding the whole
    /// column total would fill.
    pub column_fill: f64,

    /// Vertical gap between stacked nodes.
    pub node_gap: f64,

    /// Inset of the link ends from the top and bottom of a node.
    pub node_padding: f64,

    /// Minimum width of a link end.  Non-zero values keep tiny flows visible
    /// at the cost of links overflowing their node.
    pub min_link_width: f64,

    /// Horizontal position of the link control points, as a fraction of the
    /// distance between the two columns.
    pub curvature: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margins: Insets::new(15.0, 20.0, 15.0, 20.0),
            node_width_fraction: 0.12,
            min_node_width: 60.0,
            max_node_width: 90.0,
            min_node_height: 50.0,
            max_node_height: 120.0,
            vertical_reserve: 30.0,
            column_fill: 0.8,
            node_gap: 4.0,
            node_padding: 0.0,
            min_link_width: 0.0,
            curvature: 1.0 / 3.0,
        }
    }
}

impl LayoutConfig {
    /// Checks that the configuration is usable.
    ///
    /// A canvas too small for the configured node sizes is not an error; the
    /// layout degrades instead.
    pub fn validate(&self) -> Result<(), Error> {
        let non_negative = [
            ("margins.top", self.margins.top()),
            ("margins.right", self.margins.right()),
            ("margins.bottom", self.margins.bottom()),
            ("margins.left", self.margins.left()),
            ("node_width_fraction", self.node_width_fraction),
            ("min_node_width", self.min_node_width),
            ("max_node_width", self.max_node_width),
            ("min_node_height", self.min_node_height),
            ("max_node_height", self.max_node_height),
            ("vertical_reserve", self.vertical_reserve),
            ("node_gap", self.node_gap),
            ("node_padding", self.node_padding),
            ("min_link_width", self.min_link_width),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_config(format!(
                    "{name} must be a non-negative finite number, got {value}."
                )));
            }
        }

        if self.min_node_width > self.max_node_width {
            return Err(Error::invalid_config(format!(
                "min_node_width ({}) can't be larger than max_node_width ({}).",
                self.min_node_width, self.max_node_width
            )));
        }
        if self.min_node_height > self.max_node_height {
            return Err(Error::invalid_config(format!(
                "min_node_height ({}) can't be larger than max_node_height ({}).",
                self.min_node_height, self.max_node_height
            )));
        }
        if !(self.column_fill > 0.0 && self.column_fill <= 1.0) {
            return Err(Error::invalid_config(format!(
                "column_fill must be within (0, 1], got {}.",
                self.column_fill
            )));
        }
        if !(0.0..=1.0).contains(&self.curvature) {
            return Err(Error::invalid_config(format!(
                "curvature must be within [0, 1], got {}.",
                self.curvature
            )));
        }
        if 2.0 * self.node_padding > self.min_node_height {
            return Err(Error::invalid_config(format!(
                "node_padding ({}) doesn't fit twice into min_node_height ({}).",
                self.node_padding, self.min_node_height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() -> Result<(), Error> {
        DecompositionConfig::default().validate()?;
        LayoutConfig::default().validate()?;
        Ok(())
    }

    #[test]
    fn test_decomposition_config_validation() {
        let config = DecompositionConfig { epsilon: -0.1 };
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config(
                "epsilon must be a non-negative finite number, got -0.1."
            ))
        );
        let config = DecompositionConfig { epsilon: f64::NAN };
        assert!(config.validate().is_err_and(|e| e.is_invalid_config()));
    }

    #[test]
    fn test_layout_config_validation() {
        let config = LayoutConfig {
            min_node_width: 100.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config(
                "min_node_width (100) can't be larger than max_node_width (90)."
            ))
        );

        let config = LayoutConfig {
            max_node_height: 10.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config(
                "min_node_height (50) can't be larger than max_node_height (10)."
            ))
        );

        let config = LayoutConfig {
            curvature: 1.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config(
                "curvature must be within [0, 1], got 1.5."
            ))
        );

        let config = LayoutConfig {
            column_fill: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err_and(|e| e.is_invalid_config()));

        let config = LayoutConfig {
            node_gap: -4.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::invalid_config(
                "node_gap must be a non-negative finite number, got -4."
            ))
        );

        let config = LayoutConfig {
            node_padding: 30.0,
            ..Default::default()
        };
        assert!(config.validate().is_err_and(|e| e.is_invalid_config()));
    }
}
