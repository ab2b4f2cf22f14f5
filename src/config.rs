use std::path::Path;

use serde::Deserialize;

use crate::data::interpolate::YearRange;
use crate::error::{Result, SeaLevelError};

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Settings shared by loading, querying and the scene controller.
///
/// Every field has a default, so a config file only needs to name what it
/// overrides:
///
/// ```json
/// { "max_year": 2100, "top_n": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// First decade sample and lower clamp of the year slider.
    pub min_year: i32,
    /// Last decade sample; continuous years at or beyond it are flat.
    pub max_year: i32,
    /// Spacing of the samples in years.
    pub decade_width: i32,
    /// Height above the geoid at which the player is placed after a jump.
    pub spawn_height_m: f64,
    /// Bars in the ranking chart.
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        let range = YearRange::default();
        Config {
            min_year: range.min_year,
            max_year: range.max_year,
            decade_width: range.decade_width,
            spawn_height_m: 50.0,
            top_n: 10,
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SeaLevelError::InvalidConfig(format!("reading {}: {e}", path.display()))
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| {
            SeaLevelError::InvalidConfig(format!("parsing {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.decade_width <= 0 {
            return Err(SeaLevelError::InvalidConfig(format!(
                "decade_width must be positive, got {}",
                self.decade_width
            )));
        }
        if self.max_year < self.min_year {
            return Err(SeaLevelError::InvalidConfig(format!(
                "max_year {} is before min_year {}",
                self.max_year, self.min_year
            )));
        }
        Ok(())
    }

    pub fn year_range(&self) -> YearRange {
        YearRange {
            min_year: self.min_year,
            max_year: self.max_year,
            decade_width: self.decade_width,
        }
    }

    /// Map a slider position in `0..=1` onto a continuous year.
    pub fn continuous_year(&self, fraction: f64) -> f64 {
        let t = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.min_year as f64 + (self.max_year as f64 - self.min_year as f64) * t
    }
}
