use serde::{Deserialize, Serialize};

use crate::config::ChartStyles;
use crate::core::{Bounding, PaneId, Precision};
use crate::error::{ChartError, ChartResult};

/// Bootstrap configuration of one candle pane.
///
/// Serializable so a host can persist the pane setup next to its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlePaneConfig {
    #[serde(default = "default_pane_id")]
    pub pane_id: PaneId,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_bar_spacing")]
    pub bar_spacing: f64,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub styles: ChartStyles,
}

impl CandlePaneConfig {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            pane_id: default_pane_id(),
            width,
            height,
            bar_spacing: default_bar_spacing(),
            precision: Precision::default(),
            styles: ChartStyles::default(),
        }
    }

    #[must_use]
    pub fn with_pane_id(mut self, pane_id: PaneId) -> Self {
        self.pane_id = pane_id;
        self
    }

    #[must_use]
    pub fn with_bar_spacing(mut self, bar_spacing: f64) -> Self {
        self.bar_spacing = bar_spacing;
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: ChartStyles) -> Self {
        self.styles = styles;
        self
    }

    #[must_use]
    pub fn bounding(&self) -> Bounding {
        Bounding::from_size(self.width, self.height)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.bounding().is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !self.bar_spacing.is_finite() || self.bar_spacing <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "bar_spacing must be finite and > 0, got {}",
                self.bar_spacing
            )));
        }
        self.styles.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize pane config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse pane config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_pane_id() -> PaneId {
    PaneId::CANDLE
}

fn default_bar_spacing() -> f64 {
    8.0
}

#[cfg(test)]
mod tests {
    use super::CandlePaneConfig;
    use crate::error::ChartError;

    #[test]
    fn partial_json_fills_defaults() {
        let config = CandlePaneConfig::from_json_str(r#"{"width": 640, "height": 320}"#)
            .expect("valid config");
        assert_eq!(config, CandlePaneConfig::new(640.0, 320.0));
    }

    #[test]
    fn zero_height_is_rejected() {
        let err = CandlePaneConfig::from_json_str(r#"{"width": 640, "height": 0}"#)
            .expect_err("zero height");
        assert!(matches!(err, ChartError::InvalidViewport { .. }));
    }
}
