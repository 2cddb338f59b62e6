use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::asset::{self, AnimationAsset};
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{DateRange, FilterSelection};
use crate::data::loader;
use crate::data::model::Dataset;
use crate::pipeline::{self, DashboardView, RenderOptions};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Overview,
    Continents,
    Histograms,
    TimeSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapTab {
    #[default]
    AllAreas,
    Markers,
    Clusters,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub options: RenderOptions,

    /// Loaded dataset (empty until a file loads).
    pub dataset: Dataset,
    /// Where `dataset` came from.
    pub source: Option<PathBuf>,

    /// Current widget selection.
    pub selection: FilterSelection,
    /// Output of the last render and the selection it was computed for.
    pub view: DashboardView,
    rendered_for: Option<FilterSelection>,

    /// Per-continent colours for the current dataset.
    pub color_map: ColorMap,

    /// Side-panel decoration, absent when it could not be loaded.
    pub animation: Option<AnimationAsset>,
    /// Decoration leading the KPI row.
    pub kpi_animation: Option<AnimationAsset>,

    pub chart_tab: ChartTab,
    pub map_tab: MapTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let options = RenderOptions::from(&config);
        Self {
            config,
            options,
            dataset: Dataset::default(),
            source: None,
            selection: FilterSelection::default(),
            view: DashboardView::default(),
            rendered_for: None,
            color_map: ColorMap::default(),
            animation: None,
            kpi_animation: None,
            chart_tab: ChartTab::default(),
            map_tab: MapTab::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the filters to its bounds.
    pub fn set_dataset(&mut self, dataset: Dataset, source: PathBuf) {
        self.color_map = ColorMap::new(&dataset.continents);
        self.selection = FilterSelection {
            date_range: dataset.date_bounds.map(|(lo, hi)| DateRange::new(lo, hi)),
            ..FilterSelection::default()
        };
        self.dataset = dataset;
        self.source = Some(source);
        self.status_message = None;
        self.rendered_for = None;
        self.refresh();
    }

    /// Load `path`, keeping the current dataset if it fails.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Load the configured default dataset.
    pub fn load_default(&mut self) {
        let path = self.config.default_dataset.clone();
        if path.exists() {
            self.load_path(&path);
        } else {
            log::warn!("Default dataset {} not found", path.display());
            self.status_message = Some(format!(
                "Default dataset {} not found; open a file to begin.",
                path.display()
            ));
        }
    }

    /// Load both decorative animations named in the config.
    pub fn load_decorations(&mut self) {
        self.animation = self.config.animation_source.as_deref().and_then(asset::load_animation);
        self.kpi_animation = self
            .config
            .kpi_animation_source
            .as_deref()
            .and_then(asset::load_animation);
    }

    /// Re-run the pipeline when the selection changed since the last render.
    pub fn refresh(&mut self) {
        if self.rendered_for.as_ref() == Some(&self.selection) {
            return;
        }
        self.view = pipeline::render(&self.dataset, &self.selection, &self.options);
        self.rendered_for = Some(self.selection.clone());
    }

    /// Start/end dates shown by the pickers.
    pub fn picker_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.selection
            .date_range
            .or(self.view.date_range)
            .map(|r| (r.start, r.end))
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.selection.date_range = Some(DateRange::new(start, end));
    }

    pub fn toggle_continent(&mut self, continent: &str) {
        toggle(&mut self.selection.continents, continent);
    }

    pub fn toggle_country(&mut self, country: &str) {
        toggle(&mut self.selection.countries, country);
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
