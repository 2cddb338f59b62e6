use std::collections::BTreeSet;

use crate::config::DashboardConfig;
use crate::data::aggregate::{
    above_magnitude, histogram, kpis, mean_yearly_count, median_by_continent, yearly_counts,
    GroupMedian, HistogramBin, Kpis, YearCount,
};
use crate::data::filter::{
    continent_options, country_options, effective_range, filter_by_date, filter_by_geography,
    DateRange, FilterSelection, GeoPrecedence,
};
use crate::data::geo::{self, Cluster};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Render options
// ---------------------------------------------------------------------------

/// The knobs of one render pass, taken from [`DashboardConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub precedence: GeoPrecedence,
    pub excluded_year: Option<i32>,
    pub marker_threshold: f64,
    pub cluster_threshold: f64,
    pub histogram_bins: usize,
    pub cluster_cell_degrees: f64,
}

impl From<&DashboardConfig> for RenderOptions {
    fn from(cfg: &DashboardConfig) -> Self {
        Self {
            precedence: cfg.geo_precedence,
            excluded_year: cfg.excluded_year,
            marker_threshold: cfg.marker_threshold,
            cluster_threshold: cfg.cluster_threshold,
            histogram_bins: cfg.histogram_bins,
            cluster_cell_degrees: cfg.cluster_cell_degrees,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Rendered view
// ---------------------------------------------------------------------------

/// Everything the presentation layer draws, derived from one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Date interval actually applied (after defaulting and clamping).
    pub date_range: Option<DateRange>,
    /// Continent choices offered in the side panel.
    pub continent_options: BTreeSet<String>,
    /// Country choices offered in the side panel.
    pub country_options: BTreeSet<String>,
    /// Indices of events in the filtered view.
    pub indices: Vec<usize>,
    pub kpis: Kpis,
    pub magnitude_by_continent: Vec<GroupMedian>,
    pub depth_by_continent: Vec<GroupMedian>,
    pub yearly_counts: Vec<YearCount>,
    pub mean_yearly_count: Option<f64>,
    pub magnitude_histogram: Vec<HistogramBin>,
    pub depth_histogram: Vec<HistogramBin>,
    /// Events above the marker threshold.
    pub marker_indices: Vec<usize>,
    pub marker_center: Option<(f64, f64)>,
    /// Events above the cluster threshold.
    pub cluster_indices: Vec<usize>,
    pub cluster_center: Option<(f64, f64)>,
    pub clusters: Vec<Cluster>,
}

/// Run filter → aggregate for one selection. Pure: the same inputs always
/// give the same view, and nothing is retained between calls.
pub fn render(
    dataset: &Dataset,
    selection: &FilterSelection,
    options: &RenderOptions,
) -> DashboardView {
    let Some(date_range) = effective_range(dataset, selection.date_range) else {
        return DashboardView::default();
    };

    let dated = filter_by_date(dataset, date_range);
    let indices = filter_by_geography(
        dataset,
        &dated,
        &selection.continents,
        &selection.countries,
        options.precedence,
    );

    let view = || dataset.select(&indices);
    let magnitudes: Vec<f64> = view().map(|e| e.magnitude).collect();
    let depths: Vec<f64> = view().map(|e| e.depth).collect();
    let yearly = yearly_counts(view(), options.excluded_year);

    let marker_indices = above_magnitude(dataset, &indices, options.marker_threshold);
    let cluster_indices = above_magnitude(dataset, &indices, options.cluster_threshold);

    log::debug!(
        "render: {} of {} events in {date_range:?}",
        indices.len(),
        dataset.len()
    );

    DashboardView {
        date_range: Some(date_range),
        continent_options: continent_options(dataset, &dated),
        country_options: country_options(dataset, &dated, &selection.continents),
        kpis: kpis(view()),
        magnitude_by_continent: median_by_continent(view(), |e| e.magnitude),
        depth_by_continent: median_by_continent(view(), |e| e.depth),
        mean_yearly_count: mean_yearly_count(&yearly),
        yearly_counts: yearly,
        magnitude_histogram: histogram(&magnitudes, options.histogram_bins),
        depth_histogram: histogram(&depths, options.histogram_bins),
        marker_center: geo::center(dataset.select(&marker_indices)),
        cluster_center: geo::center(dataset.select(&cluster_indices)),
        clusters: geo::cluster(dataset.select(&cluster_indices), options.cluster_cell_degrees),
        marker_indices,
        cluster_indices,
        indices,
    }
}
