use crate::adapters::http::{AIRLINES_URL, AIRPORTS_URL, ROUTES_URL};
use crate::adapters::render::DEFAULT_TILE_URL;
use crate::config::{validate_settings, DEFAULT_AIRLINE, DEFAULT_OUTPUT_PATH};
use crate::core::geometry::DEFAULT_ARC_POINTS;
use crate::core::ConfigProvider;
use crate::domain::model::AirlineSelector;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub airline: AirlineConfig,
    pub source: SourceConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirlineConfig {
    pub name: String,
    pub id: Option<i64>,
}

impl Default for AirlineConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_AIRLINE.to_string(),
            id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub airports_url: String,
    pub routes_url: String,
    pub airlines_url: String,
    pub timeout_seconds: Option<u64>,
    pub cache_dir: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            airports_url: AIRPORTS_URL.to_string(),
            routes_url: ROUTES_URL.to_string(),
            airlines_url: AIRLINES_URL.to_string(),
            timeout_seconds: None,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output_path: String,
    pub summary_csv: Option<String>,
    pub arc_points: usize,
    pub tiles: bool,
    pub tile_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            summary_csv: None,
            arc_points: DEFAULT_ARC_POINTS,
            tiles: true,
            tile_url: DEFAULT_TILE_URL.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CACHE_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl ConfigProvider for TomlConfig {
    fn airline(&self) -> AirlineSelector {
        match self.airline.id {
            Some(id) => AirlineSelector::Id(id),
            None => AirlineSelector::Name(self.airline.name.clone()),
        }
    }

    fn airports_url(&self) -> &str {
        &self.source.airports_url
    }

    fn routes_url(&self) -> &str {
        &self.source.routes_url
    }

    fn airlines_url(&self) -> &str {
        &self.source.airlines_url
    }

    fn output_path(&self) -> &str {
        &self.render.output_path
    }

    fn summary_csv_path(&self) -> Option<&str> {
        self.render.summary_csv.as_deref()
    }

    fn arc_points(&self) -> usize {
        self.render.arc_points
    }

    fn tile_url(&self) -> Option<&str> {
        self.render.tiles.then_some(self.render.tile_url.as_str())
    }

    fn cache_dir(&self) -> Option<&str> {
        self.source.cache_dir.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.source.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}
