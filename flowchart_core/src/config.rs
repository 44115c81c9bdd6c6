//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! [geometry]
//! vertical_threshold = 10.0
//!
//! [routing]
//! style = "orthogonal"
//! gutter = { fixed = 24.0 }
//! arrowheads = true
//!
//! [scheduler]
//! settle_delay_ms = 50
//! transition_ms = 400
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowchartConfig {
    pub geometry: GeometryConfig,
    pub routing: RoutingConfig,
    pub scheduler: SchedulerConfig,
}

impl FlowchartConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: FlowchartConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("geometry.vertical_threshold", self.geometry.vertical_threshold)?;
        non_negative("routing.curve_offset", self.routing.curve_offset)?;
        if let Gutter::Fixed(px) = self.routing.gutter {
            non_negative("routing.gutter.fixed", px)?;
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite non-negative number, got {value}"),
        })
    }
}

/// Orientation detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// How far (px) the destination's top must sit below the source's bottom
    /// for a connection to be treated as vertical flow.
    pub vertical_threshold: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            vertical_threshold: 10.0,
        }
    }
}

/// Connector routing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStyle {
    /// Cubic S-curves.
    #[default]
    Curve,
    /// Right-angle paths through the channel between rows.
    Orthogonal,
}

/// Offset of the channel an orthogonal path travels through.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gutter {
    /// Fixed distance (px) from the start anchor.
    Fixed(f64),
    /// Midway between start and end.
    #[default]
    HalfGap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub style: RoutingStyle,
    /// Control point offset (px) for curves.
    pub curve_offset: f64,
    pub gutter: Gutter,
    /// Draw an arrowhead at the destination end.
    pub arrowheads: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            style: RoutingStyle::Curve,
            curve_offset: 40.0,
            gutter: Gutter::HalfGap,
            arrowheads: true,
        }
    }
}

/// Redraw timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay before the single redraw after a tab switch.
    pub settle_delay_ms: u64,
    /// Length of the expand/collapse transition; must match the page's CSS.
    pub transition_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 50,
            transition_ms: 400,
        }
    }
}
