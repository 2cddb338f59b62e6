use std::collections::BTreeSet;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use eframe::egui::{self, Color32, Pos2, RichText, ScrollArea, Stroke, Ui};
use egui_extras::DatePickerButton;

use crate::asset::AnimationAsset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What the user did in a multi-select block.
enum Pick {
    Toggle(String),
    Clear,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    if let Some(animation) = &state.animation {
        spinning_globe(ui, animation);
        ui.add_space(4.0);
    }

    ui.heading("Choose your filter");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("No dataset loaded.");
        about(ui);
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            if let Some((mut start, mut end)) = state.picker_dates() {
                ui.strong("Start Date");
                let start_changed = ui
                    .add(DatePickerButton::new(&mut start).id_salt("start_date"))
                    .changed();
                ui.strong("End Date");
                let end_changed = ui
                    .add(DatePickerButton::new(&mut end).id_salt("end_date"))
                    .changed();
                if start_changed || end_changed {
                    state.set_date_range(start, end);
                }
                if end < start {
                    ui.label(
                        RichText::new("End date is before start date.").color(Color32::YELLOW),
                    );
                }
            }
            ui.separator();

            // ---- Continent / country ----
            let continents = state.view.continent_options.clone();
            match multiselect(ui, "Pick your continent", &continents, &state.selection.continents) {
                Some(Pick::Toggle(c)) => state.toggle_continent(&c),
                Some(Pick::Clear) => state.selection.continents.clear(),
                None => {}
            }

            let countries = state.view.country_options.clone();
            match multiselect(ui, "Pick the country", &countries, &state.selection.countries) {
                Some(Pick::Toggle(c)) => state.toggle_country(&c),
                Some(Pick::Clear) => state.selection.countries.clear(),
                None => {}
            }

            ui.separator();
            about(ui);
        });

    // Re-render if any widget changed the selection.
    state.refresh();
}

/// Collapsible checkbox list. Selected values that are no longer offered
/// stay listed so they can be unticked.
fn multiselect(
    ui: &mut Ui,
    title: &str,
    options: &BTreeSet<String>,
    selected: &BTreeSet<String>,
) -> Option<Pick> {
    let mut pick = None;
    let header = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                pick = Some(Pick::Clear);
            }
            for value in options.union(selected) {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    pick = Some(Pick::Toggle(value.clone()));
                }
            }
        });
    pick
}

fn about(ui: &mut Ui) {
    egui::CollapsingHeader::new("About")
        .id_salt("about")
        .show(ui, |ui: &mut Ui| {
            ui.label(
                "Explore a catalogue of earthquakes: narrow it by date, continent \
                 and country, compare magnitude and depth per continent, follow \
                 the yearly event count and locate the strongest events on the map.",
            );
        });
}

/// A wireframe globe turning once per loop of the loaded animation.
fn spinning_globe(ui: &mut Ui, animation: &AnimationAsset) {
    let height = animation.height.map_or(110.0, |h| (h as f32).clamp(60.0, 110.0));
    let (rect, _) =
        ui.allocate_exact_size(egui::vec2(ui.available_width(), height), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = height * 0.45;

    let period = animation.duration_secs().max(0.1);
    let phase = ((ui.input(|i| i.time) / period).fract() as f32) * TAU;

    let line = Stroke::new(1.0, Color32::from_white_alpha(140));
    painter.circle_filled(center, radius, Color32::from_rgb(28, 84, 150));
    painter.circle_stroke(center, radius, Stroke::new(1.5, Color32::WHITE));
    painter.line_segment(
        [center - egui::vec2(radius, 0.0), center + egui::vec2(radius, 0.0)],
        line,
    );

    for k in 0..6 {
        let half_width = radius * (phase + k as f32 * PI / 6.0).cos();
        let meridian: Vec<Pos2> = (0..=32)
            .map(|s| {
                let theta = -FRAC_PI_2 + PI * s as f32 / 32.0;
                center + egui::vec2(half_width * theta.cos(), radius * theta.sin())
            })
            .collect();
        painter.add(egui::Shape::line(meridian, line));
    }

    ui.ctx().request_repaint();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload default").clicked() {
                state.load_default();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = &state.source {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            ui.label(format!(
                "{name}: {} events loaded, {} shown",
                state.dataset.len(),
                state.view.indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open earthquake data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
