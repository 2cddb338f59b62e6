use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::GeoPrecedence;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "QUAKEVIEW_CONFIG";
/// Config file looked up in the working directory when the variable is unset.
pub const CONFIG_FILE: &str = "quakeview.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field may be omitted from the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset loaded at startup and by "Reload default".
    pub default_dataset: PathBuf,
    /// Lottie animation shown in the side panel: URL or local path.
    pub animation_source: Option<String>,
    /// Lottie animation shown beside the KPI cards.
    pub kpi_animation_source: Option<String>,
    /// Year left out of the time series (known to be incomplete).
    pub excluded_year: Option<i32>,
    /// Events strictly above this magnitude get individual markers.
    pub marker_threshold: f64,
    /// Events strictly above this magnitude feed the cluster map.
    pub cluster_threshold: f64,
    pub histogram_bins: usize,
    /// Side of a cluster cell in degrees.
    pub cluster_cell_degrees: f64,
    pub geo_precedence: GeoPrecedence,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_dataset: PathBuf::from("earthquake_country_continent_cleaned_data.csv"),
            animation_source: Some("globe.json".to_string()),
            kpi_animation_source: Some("dashboard.json".to_string()),
            excluded_year: Some(2023),
            marker_threshold: 7.0,
            cluster_threshold: 5.0,
            histogram_bins: 10,
            cluster_cell_degrees: 10.0,
            geo_precedence: GeoPrecedence::CountryOverrides,
        }
    }
}

impl DashboardConfig {
    /// Read the config from `$QUAKEVIEW_CONFIG`, else `./quakeview.json`.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    log::debug!("No {CONFIG_FILE} found, using built-in defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
