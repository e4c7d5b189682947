//! Sheet configuration and grid presets

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};
use crate::layout::{GridConfig, PageDimensions};
use crate::render::SheetStyle;

/// Largest sheet accepted by default
pub const DEFAULT_MAX_CELLS: u32 = 1000;

/// Height of the title band on the first page
pub const DEFAULT_TITLE_HEIGHT: f32 = 40.0;

/// The two supported sheet layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridPreset {
    /// 5 columns × 25 rows, number + single response area
    #[default]
    Standard,
    /// 4 columns × 25 rows, response area split into Response / Review
    Reviewed,
}

impl GridPreset {
    pub fn grid(self) -> GridConfig {
        match self {
            GridPreset::Standard => GridConfig::new(5, 25),
            GridPreset::Reviewed => GridConfig::new(4, 25).with_subdivisions(["Response", "Review"]),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GridPreset::Standard => "standard",
            GridPreset::Reviewed => "reviewed",
        }
    }
}

impl FromStr for GridPreset {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(GridPreset::Standard),
            "reviewed" => Ok(GridPreset::Reviewed),
            other => Err(SheetError::InvalidConfig(format!("unknown preset '{other}'"))),
        }
    }
}

/// Everything that shapes a generated sheet apart from the request itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub page: PageDimensions,
    pub grid: GridConfig,
    /// Vertical space reserved for the title on page 1
    pub title_height: f32,
    /// Caller policy bound on the cell count
    pub max_cells: u32,
    pub style: SheetStyle,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::preset(GridPreset::Standard)
    }
}

impl SheetConfig {
    pub fn preset(preset: GridPreset) -> Self {
        let style = SheetStyle {
            column_headers: preset == GridPreset::Reviewed,
            ..SheetStyle::default()
        };
        Self {
            page: PageDimensions::A4,
            grid: preset.grid(),
            title_height: DEFAULT_TITLE_HEIGHT,
            max_cells: DEFAULT_MAX_CELLS,
            style,
        }
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| {
            SheetError::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Check invariants that do not depend on the request
    pub fn validate(&self) -> Result<()> {
        self.page.validate()?;
        self.grid.validate()?;
        if self.max_cells == 0 {
            return Err(SheetError::InvalidConfig("max_cells must be at least 1".into()));
        }
        if !self.title_height.is_finite() || self.title_height <= 0.0 {
            return Err(SheetError::InvalidConfig(format!(
                "title_height must be positive, got {}",
                self.title_height
            )));
        }
        Ok(())
    }
}
