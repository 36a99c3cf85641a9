use serde::{Deserialize, Serialize};

use super::{CategoryPalette, Size};
use crate::error::{FlowError, Result};

/// Smallest grid spacing accepted, in canvas units.
pub const MIN_GRID_SPACING: f64 = 4.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub palette: CategoryPalette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            canvas: CanvasSettings::default(),
            layout: LayoutSettings::default(),
            render: RenderSettings::default(),
            viewport: ViewportSettings::default(),
            refresh: RefreshSettings::default(),
            palette: CategoryPalette::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(FlowError::InvalidSettings(msg.to_string()));

        if !self.canvas_size().is_drawable() {
            return invalid("canvas size must be positive and finite");
        }
        if !is_positive(self.layout.node_width) || !is_positive(self.layout.node_height) {
            return invalid("node size must be positive and finite");
        }
        if !is_non_negative(self.layout.horizontal_spacing)
            || !is_non_negative(self.layout.vertical_spacing)
            || !is_non_negative(self.layout.margin)
        {
            return invalid("spacing and margin must be finite and not negative");
        }
        if !is_non_negative(self.render.min_edge_width)
            || !is_non_negative(self.render.max_edge_width)
            || self.render.min_edge_width > self.render.max_edge_width
        {
            return invalid("edge widths must be finite with min_edge_width <= max_edge_width");
        }
        if !self.render.grid_spacing.is_finite() || self.render.grid_spacing < MIN_GRID_SPACING {
            return invalid("grid_spacing is below the minimum of 4");
        }
        if !is_non_negative(self.render.grid_opacity)
            || !is_non_negative(self.render.arrow_length)
            || !self.render.arrow_angle_degrees.is_finite()
        {
            return invalid("grid opacity and arrow geometry must be finite");
        }
        if !is_positive(self.viewport.min_scale)
            || !is_positive(self.viewport.max_scale)
            || self.viewport.min_scale > self.viewport.max_scale
        {
            return invalid("viewport scale bounds are inverted, non-positive or not finite");
        }
        if self.refresh.interval_secs == 0 {
            return invalid("refresh interval must be at least one second");
        }
        Ok(())
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas.width, self.canvas.height)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        let size = Size::default();
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub node_width: f64,
    pub node_height: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub margin: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            node_width: 140.0,
            node_height: 72.0,
            horizontal_spacing: 80.0,
            vertical_spacing: 24.0,
            margin: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub grid_spacing: f64,
    pub grid_opacity: f64,
    pub min_edge_width: f64,
    pub max_edge_width: f64,
    pub arrow_length: f64,
    pub arrow_angle_degrees: f64,
    pub label_max_chars: usize,
    pub empty_message: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            grid_spacing: 30.0,
            grid_opacity: 0.08,
            min_edge_width: 1.0,
            max_edge_width: 4.0,
            arrow_length: 10.0,
            arrow_angle_degrees: 25.0,
            label_max_chars: 14,
            empty_message: "No patterns logged today. Cascades appear once patterns are detected.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    pub min_scale: f64,
    pub max_scale: f64,
    pub reset_duration_ms: u64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            reset_duration_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    pub interval_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}
