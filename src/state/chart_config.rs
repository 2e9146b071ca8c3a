use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::processing::segmentation::DEFAULT_THRESHOLD;
use crate::state::theme::Theme;

/// Stroke used for any point or segment above the threshold.
pub const FLAGGED_COLOR: [u8; 4] = [255, 0, 0, 255];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),

    #[error("series {0:?} is configured more than once")]
    DuplicateSeries(String),
}

/// How one field of the dataset is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub field: String,
    pub color: [u8; 4],
    #[serde(default = "flagged_color")]
    pub flagged_color: [u8; 4],
}

fn flagged_color() -> [u8; 4] {
    FLAGGED_COLOR
}

impl SeriesStyle {
    pub fn new(field: impl Into<String>, color: [u8; 4]) -> Self {
        Self {
            field: field.into(),
            color,
            flagged_color: FLAGGED_COLOR,
        }
    }
}

/// Chart settings, loadable from a JSON file. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Deviation threshold in standard deviations.
    pub threshold: f64,
    pub theme: Theme,
    pub series: Vec<SeriesStyle>,
    pub line_width: f32,
    pub marker_radius: f32,
    pub show_markers: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            theme: Theme::default(),
            series: vec![
                SeriesStyle::new("pv", [136, 132, 216, 255]),
                SeriesStyle::new("uv", [130, 202, 157, 255]),
            ],
            line_width: 2.0,
            marker_radius: 3.0,
            show_markers: true,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        for (i, style) in self.series.iter().enumerate() {
            if self.series[..i].iter().any(|s| s.field == style.field) {
                return Err(ConfigError::DuplicateSeries(style.field.clone()));
            }
        }
        Ok(())
    }

    /// Replace the threshold, rejecting non-finite values.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }
}
