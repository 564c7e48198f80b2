#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_tile_template,
    validate_url,
};

pub const DEFAULT_AIRLINE: &str = "Air France";
pub const DEFAULT_OUTPUT_PATH: &str = "html/airline_routes.html";
pub const MAX_ARC_POINTS: usize = 10_000;

/// Checks shared by every configuration source.
pub(crate) fn validate_settings<C: crate::core::ConfigProvider>(config: &C) -> Result<()> {
    if let crate::domain::model::AirlineSelector::Name(name) = config.airline() {
        validate_non_empty_string("airline", &name)?;
    }
    validate_url("airports_url", config.airports_url())?;
    validate_url("routes_url", config.routes_url())?;
    validate_url("airlines_url", config.airlines_url())?;
    validate_path("output_path", config.output_path())?;
    if let Some(path) = config.summary_csv_path() {
        validate_path("summary_csv", path)?;
    }
    if let Some(dir) = config.cache_dir() {
        validate_path("cache_dir", dir)?;
    }
    if let Some(template) = config.tile_url() {
        validate_tile_template("tile_url", template)?;
    }
    if let Some(seconds) = config.timeout_seconds() {
        validate_range("timeout_seconds", seconds, 1, 3600)?;
    }
    validate_range("arc_points", config.arc_points(), 0, MAX_ARC_POINTS)
}
