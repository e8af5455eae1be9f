use std::env;
use std::path::Path;

use scene::components::{Color, LabelStyle, LineStyle, PointStyle, PolygonStyle};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for the capture sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Fewest confirmed clicks a drawing needs to be committed.
    pub min_vertex_count: usize,
    /// Fewest points a region needs to become a polygon.
    pub min_region_points: usize,
    /// Committed regions are named `"{region_prefix} {n}"`.
    pub region_prefix: String,
    pub styles: CaptureStyles,
}

/// How each session draws. Colors accept CSS hex strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureStyles {
    /// Numbered vertex markers of a drawing.
    pub marker: PointStyle,
    pub marker_label: LabelStyle,
    /// The drawing's line, both while it follows the cursor and once frozen.
    pub draw_line: LineStyle,
    /// Two-point region preview.
    pub region_line: LineStyle,
    /// Region preview from three points on, and committed regions.
    pub region_polygon: PolygonStyle,
    pub region_label: LabelStyle,
}

impl Default for CaptureStyles {
    fn default() -> Self {
        Self {
            marker: PointStyle::default(),
            marker_label: LabelStyle::default(),
            draw_line: LineStyle::default(),
            region_line: LineStyle {
                color: Color::RED,
                depth_fail_color: None,
                ..LineStyle::default()
            },
            region_polygon: PolygonStyle::default(),
            region_label: LabelStyle {
                font: "12px sans-serif".to_string(),
                pixel_offset: [0.0, 0.0],
                always_on_top: false,
                ..LabelStyle::default()
            },
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_vertex_count: 2,
            min_region_points: 3,
            region_prefix: "Region".to_string(),
            styles: CaptureStyles::default(),
        }
    }
}

impl CaptureConfig {
    /// Read a JSON config file, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// `CAPTURE_MIN_VERTICES` and `CAPTURE_REGION_PREFIX`; unset or
    /// unparsable values keep the current setting.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("CAPTURE_MIN_VERTICES") {
            match raw.parse() {
                Ok(n) => self.min_vertex_count = n,
                Err(_) => tracing::warn!(value = %raw, "ignoring unparsable CAPTURE_MIN_VERTICES"),
            }
        }
        if let Some(prefix) = lookup("CAPTURE_REGION_PREFIX") {
            self.region_prefix = prefix;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_vertex_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_vertex_count must be at least 2, got {}",
                self.min_vertex_count
            )));
        }
        if self.min_region_points < 3 {
            return Err(ConfigError::Invalid(format!(
                "min_region_points must be at least 3, got {}",
                self.min_region_points
            )));
        }
        if self.region_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("region_prefix is empty".to_string()));
        }
        Ok(())
    }
}
