use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, LineStyle, Plot, PlotPoints, Points};

use crate::asset::AnimationAsset;
use crate::data::aggregate::{GroupMedian, HistogramBin, Kpis};
use crate::data::export::{self, DEPTH_FILE, MAGNITUDE_FILE};
use crate::data::model::columns;
use crate::state::{AppState, ChartTab};

const CHART_HEIGHT: f32 = 280.0;
const HISTOGRAM_FILL: Color32 = Color32::from_rgb(205, 92, 92);
const KPI_DECORATION_HEIGHT: f32 = 56.0;

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"))
}

/// KPI cards, led by the decoration column when an animation is loaded.
pub fn kpi_row(ui: &mut Ui, kpis: &Kpis, animation: Option<&AnimationAsset>) {
    let cards = [
        ("Minimum Magnitude", fmt_metric(kpis.min_magnitude)),
        ("Maximum Magnitude", fmt_metric(kpis.max_magnitude)),
        ("Minimum Depth", fmt_metric(kpis.min_depth)),
        ("Maximum Depth", fmt_metric(kpis.max_depth)),
        ("Total Earthquakes", kpis.count.to_string()),
    ];
    let lead = usize::from(animation.is_some());
    ui.columns(cards.len() + lead, |cols| {
        let (decoration, card_cols) = cols.split_at_mut(lead);
        if let (Some(animation), Some(col)) = (animation, decoration.first_mut()) {
            kpi_decoration(col, animation);
        }
        for (col, (label, value)) in card_cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.label(RichText::new(label).color(Color32::GRAY));
                ui.label(RichText::new(value).size(22.0).strong());
            });
        }
    });
}

/// Bar heights of the KPI decoration at `phase` (radians), each in [0.1, 1].
fn pulse_heights(phase: f32) -> [f32; 4] {
    std::array::from_fn(|k| 0.55 + 0.45 * (phase + k as f32 * FRAC_PI_2).sin())
}

/// Four pulsing bars, one cycle per loop of the animation.
fn kpi_decoration(ui: &mut Ui, animation: &AnimationAsset) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), KPI_DECORATION_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);

    let period = animation.duration_secs().max(0.1);
    let phase = ((ui.input(|i| i.time) / period).fract() as f32) * TAU;
    let heights = pulse_heights(phase);
    let slot = rect.width() / heights.len() as f32;

    for (k, h) in heights.iter().enumerate() {
        let left = rect.left() + slot * (k as f32 + 0.2);
        let bar = egui::Rect::from_min_max(
            egui::pos2(left, rect.bottom() - rect.height() * h),
            egui::pos2(left + slot * 0.6, rect.bottom()),
        );
        painter.rect_filled(bar, 2.0, HISTOGRAM_FILL);
    }

    ui.ctx().request_repaint();
}

// ---------------------------------------------------------------------------
// Chart tabs
// ---------------------------------------------------------------------------

pub fn chart_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.chart_tab, ChartTab::Overview, "MAGNITUDE VS DEPTH");
        ui.selectable_value(&mut state.chart_tab, ChartTab::Continents, "CONTINENT WISE DATA");
        ui.selectable_value(&mut state.chart_tab, ChartTab::Histograms, "HISTOGRAM");
        ui.selectable_value(&mut state.chart_tab, ChartTab::TimeSeries, "TIME SERIES ANALYSIS");
    });
    ui.separator();

    match state.chart_tab {
        ChartTab::Overview => magnitude_vs_depth(ui, state),
        ChartTab::Continents => continent_charts(ui, state),
        ChartTab::Histograms => histograms(ui, state),
        ChartTab::TimeSeries => time_series(ui, state),
    }
}

fn magnitude_vs_depth(ui: &mut Ui, state: &AppState) {
    ui.heading("Magnitude vs Depth");
    let dataset = &state.dataset;
    let indices = &state.view.indices;

    Plot::new("magnitude_vs_depth")
        .height(CHART_HEIGHT * 1.3)
        .legend(Legend::default())
        .x_axis_label("Magnitude")
        .y_axis_label("Depth (km)")
        .show(ui, |plot_ui| {
            for continent in &state.view.continent_options {
                let points: PlotPoints = dataset
                    .select(indices)
                    .filter(|e| &e.continent == continent)
                    .map(|e| [e.magnitude, e.depth])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(continent)
                        .color(state.color_map.color_for(continent))
                        .radius(2.0),
                );
            }
        });
}

fn continent_charts(ui: &mut Ui, state: &mut AppState) {
    let magnitude = state.view.magnitude_by_continent.clone();
    let depth = state.view.depth_by_continent.clone();

    ui.columns(2, |cols| {
        cols[0].heading("Continent-Wise Magnitude");
        continent_bars(&mut cols[0], "continent_magnitude", &magnitude, state, "Median magnitude");
        cols[1].heading("Continent-Wise Depth");
        continent_bars(&mut cols[1], "continent_depth", &depth, state, "Median depth (km)");
    });

    ui.columns(2, |cols| {
        let magnitude_export = table_with_download(
            &mut cols[0],
            "Magnitude_ViewData",
            &magnitude,
            columns::MAGNITUDE,
            MAGNITUDE_FILE,
        );
        let depth_export = table_with_download(
            &mut cols[1],
            "Depth_ViewData",
            &depth,
            columns::DEPTH,
            DEPTH_FILE,
        );
        if let Some(msg) = magnitude_export.or(depth_export) {
            state.status_message = Some(msg);
        }
    });
}

fn continent_bars(ui: &mut Ui, id: &str, table: &[GroupMedian], state: &AppState, y_label: &str) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .show_x(false)
        .show(ui, |plot_ui| {
            for (i, row) in table.iter().enumerate() {
                let color = state.color_map.color_for(&row.continent);
                let bar = Bar::new(i as f64, row.value).width(0.6).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&row.continent).color(color));
            }
        });
}

/// Expandable table view plus a "Download Data" button. Returns an error
/// message when the export failed.
fn table_with_download(
    ui: &mut Ui,
    title: &str,
    table: &[GroupMedian],
    value_column: &str,
    file_name: &str,
) -> Option<String> {
    let mut error = None;
    egui::CollapsingHeader::new(title)
        .id_salt(title)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new(title).striped(true).show(ui, |ui: &mut Ui| {
                ui.strong(columns::CONTINENT);
                ui.strong(value_column);
                ui.end_row();
                for row in table {
                    ui.label(&row.continent);
                    ui.label(format!("{:.3}", row.value));
                    ui.end_row();
                }
            });

            if ui
                .button("Download Data")
                .on_hover_text("Click here to download the data as a CSV file")
                .clicked()
            {
                let target = rfd::FileDialog::new()
                    .set_file_name(file_name)
                    .add_filter("CSV", &["csv"])
                    .save_file();
                if let Some(path) = target {
                    if let Err(e) = export::save_table(&path, table, value_column) {
                        log::error!("Export failed: {e:#}");
                        error = Some(format!("Error: {e:#}"));
                    }
                }
            }
        });
    error
}

fn histograms(ui: &mut Ui, state: &AppState) {
    ui.columns(2, |cols| {
        cols[0].heading("Magnitude Histogram");
        histogram_chart(
            &mut cols[0],
            "magnitude_histogram",
            &state.view.magnitude_histogram,
            "Magnitude",
        );
        cols[1].heading("Depth Histogram");
        histogram_chart(
            &mut cols[1],
            "depth_histogram",
            &state.view.depth_histogram,
            "Depth (km)",
        );
    });
}

fn histogram_chart(ui: &mut Ui, id: &str, bins: &[HistogramBin], x_label: &str) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .fill(HISTOGRAM_FILL)
                .stroke(Stroke::new(2.0, Color32::WHITE))
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_FILL));
        });
}

fn time_series(ui: &mut Ui, state: &AppState) {
    ui.heading("Earthquakes Over The Year");
    if let Some(year) = state.options.excluded_year {
        ui.label(RichText::new(format!("{year} is excluded as incomplete.")).color(Color32::GRAY));
    }

    let points: PlotPoints = state
        .view
        .yearly_counts
        .iter()
        .map(|y| [y.year as f64, y.count as f64])
        .collect();
    let mean = state.view.mean_yearly_count;

    Plot::new("yearly_counts")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("year")
        .y_axis_label("Number of earthquakes")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Earthquakes").width(2.0));
            if let Some(mean) = mean {
                plot_ui.hline(
                    HLine::new(mean)
                        .name("Mean")
                        .color(Color32::RED)
                        .width(2.0)
                        .style(LineStyle::dashed_loose()),
                );
            }
        });
}
