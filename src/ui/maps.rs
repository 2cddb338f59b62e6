use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotPoints, PlotUi, Points, Text};

use crate::data::geo::{miller, MAX_MAP_LATITUDE};
use crate::state::{AppState, MapTab};

const MAP_HEIGHT: f32 = 420.0;
const GRATICULE: Color32 = Color32::from_gray(90);

pub fn map_tabs(ui: &mut Ui, state: &mut AppState) {
    let markers = format!("MAGNITUDE MORE THAN {}", state.options.marker_threshold);
    let clusters = format!(
        "CLUSTER FOR MAGNITUDE GREATER THAN {}",
        state.options.cluster_threshold
    );

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.map_tab, MapTab::AllAreas, "ALL AFFECTED AREAS");
        ui.selectable_value(&mut state.map_tab, MapTab::Markers, markers);
        ui.selectable_value(&mut state.map_tab, MapTab::Clusters, clusters);
    });
    ui.separator();

    match state.map_tab {
        MapTab::AllAreas => all_areas(ui, state),
        MapTab::Markers => markers_map(ui, state),
        MapTab::Clusters => cluster_map(ui, state),
    }
}

/// Parallels and meridians every 30°, in Miller coordinates.
fn graticule(plot_ui: &mut PlotUi) {
    let lat_limit = MAX_MAP_LATITUDE as i32;
    for lon in (-180..=180).step_by(30) {
        let pts: PlotPoints = (-lat_limit..=lat_limit)
            .step_by(5)
            .map(|lat| miller(lat as f64, lon as f64))
            .collect();
        plot_ui.line(Line::new(pts).color(GRATICULE).width(0.5));
    }
    for lat in (-60..=60).step_by(30) {
        let pts: PlotPoints = (-180..=180)
            .step_by(10)
            .map(|lon| miller(lat as f64, lon as f64))
            .collect();
        plot_ui.line(Line::new(pts).color(GRATICULE).width(0.5));
    }
}

/// Equal-aspect world plot with a graticule; hovering shows the item name.
fn world_plot(ui: &mut Ui, id: &str, draw: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .height(MAP_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .label_formatter(|name, _| name.to_string())
        .show(ui, |plot_ui| {
            graticule(plot_ui);
            draw(plot_ui);
        });
}

fn center_caption(ui: &mut Ui, center: Option<(f64, f64)>, count: usize) {
    let text = match center {
        Some((lat, lon)) => format!("{count} events, centred on {lat:.2}°, {lon:.2}°"),
        None => "No events above the threshold in the current selection.".to_string(),
    };
    ui.label(RichText::new(text).color(Color32::GRAY));
}

fn all_areas(ui: &mut Ui, state: &AppState) {
    ui.heading("All Affected Areas");
    let points: PlotPoints = state
        .dataset
        .select(&state.view.indices)
        .map(|e| miller(e.latitude, e.longitude))
        .collect();

    world_plot(ui, "map_all_areas", |plot_ui| {
        plot_ui.points(Points::new(points).color(Color32::BLUE).radius(1.5));
    });
}

fn markers_map(ui: &mut Ui, state: &AppState) {
    ui.heading(format!("Magnitude Greater Than {}", state.options.marker_threshold));
    center_caption(ui, state.view.marker_center, state.view.marker_indices.len());

    let markers: Vec<(String, [f64; 2])> = state
        .dataset
        .select(&state.view.marker_indices)
        .map(|e| {
            (
                format!("{} (M {:.1}, {})", e.country, e.magnitude, e.date),
                miller(e.latitude, e.longitude),
            )
        })
        .collect();

    world_plot(ui, "map_markers", |plot_ui| {
        for (label, pos) in markers {
            plot_ui.points(
                Points::new(vec![pos])
                    .name(label)
                    .shape(MarkerShape::Down)
                    .color(Color32::from_rgb(38, 120, 200))
                    .filled(true)
                    .radius(6.0),
            );
        }
    });
}

fn cluster_map(ui: &mut Ui, state: &AppState) {
    ui.heading(format!("Magnitude Greater Than {}", state.options.cluster_threshold));
    center_caption(ui, state.view.cluster_center, state.view.cluster_indices.len());

    let clusters = &state.view.clusters;
    world_plot(ui, "map_clusters", |plot_ui| {
        for c in clusters {
            let pos = miller(c.latitude, c.longitude);
            if c.count == 1 {
                plot_ui.points(
                    Points::new(vec![pos])
                        .name(format!("M {:.1}", c.max_magnitude))
                        .color(Color32::RED)
                        .filled(true)
                        .radius(1.5 * c.max_magnitude as f32),
                );
            } else {
                let radius = 8.0 + 4.0 * (c.count as f32).log2();
                plot_ui.points(
                    Points::new(vec![pos])
                        .name(format!("{} events, max M {:.1}", c.count, c.max_magnitude))
                        .color(Color32::from_rgba_unmultiplied(240, 160, 40, 170))
                        .filled(true)
                        .radius(radius),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(pos[0], pos[1]),
                        RichText::new(c.count.to_string()).strong().color(Color32::BLACK),
                    ),
                );
            }
        }
    });
}
