use crate::adapters::http::{AIRLINES_URL, AIRPORTS_URL, ROUTES_URL};
use crate::adapters::render::DEFAULT_TILE_URL;
use crate::config::{validate_settings, DEFAULT_AIRLINE, DEFAULT_OUTPUT_PATH};
use crate::core::geometry::DEFAULT_ARC_POINTS;
use crate::core::ConfigProvider;
use crate::domain::model::AirlineSelector;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "airline-routes")]
#[command(about = "Plot all routes of an airline on a world map")]
pub struct CliConfig {
    /// Airline name, as spelled in airlines.dat
    #[arg(long, default_value = DEFAULT_AIRLINE)]
    pub airline: String,

    /// Airline id; takes precedence over --airline
    #[arg(long)]
    pub airline_id: Option<i64>,

    #[arg(long, default_value = AIRPORTS_URL)]
    pub airports_url: String,

    #[arg(long, default_value = ROUTES_URL)]
    pub routes_url: String,

    #[arg(long, default_value = AIRLINES_URL)]
    pub airlines_url: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    /// Also write the airport table as CSV
    #[arg(long)]
    pub summary_csv: Option<String>,

    /// Intermediate points per route arc
    #[arg(long, default_value_t = DEFAULT_ARC_POINTS)]
    pub arc_points: usize,

    /// Background tile URL template with {Z}, {X} and {Y}
    #[arg(long, default_value = DEFAULT_TILE_URL)]
    pub tile_url: String,

    #[arg(long, help = "Render without background tiles")]
    pub no_tiles: bool,

    /// Keep downloaded datasets in this directory and reuse them
    #[arg(long)]
    pub cache_dir: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Read settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log stage timings and memory usage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            airline: DEFAULT_AIRLINE.to_string(),
            airline_id: None,
            airports_url: AIRPORTS_URL.to_string(),
            routes_url: ROUTES_URL.to_string(),
            airlines_url: AIRLINES_URL.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            summary_csv: None,
            arc_points: DEFAULT_ARC_POINTS,
            tile_url: DEFAULT_TILE_URL.to_string(),
            no_tiles: false,
            cache_dir: None,
            timeout_seconds: None,
            config: None,
            verbose: false,
            monitor: false,
            log_json: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn airline(&self) -> AirlineSelector {
        match self.airline_id {
            Some(id) => AirlineSelector::Id(id),
            None => AirlineSelector::Name(self.airline.clone()),
        }
    }

    fn airports_url(&self) -> &str {
        &self.airports_url
    }

    fn routes_url(&self) -> &str {
        &self.routes_url
    }

    fn airlines_url(&self) -> &str {
        &self.airlines_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn summary_csv_path(&self) -> Option<&str> {
        self.summary_csv.as_deref()
    }

    fn arc_points(&self) -> usize {
        self.arc_points
    }

    fn tile_url(&self) -> Option<&str> {
        if self.no_tiles {
            None
        } else {
            Some(&self.tile_url)
        }
    }

    fn cache_dir(&self) -> Option<&str> {
        self.cache_dir.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}
