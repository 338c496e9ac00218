use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{DataKind, DateBucket};
use crate::layers::ViewStats;
use crate::state::{AppState, HEAT_BLUR_RANGE, HEAT_RADIUS_RANGE};

// ---------------------------------------------------------------------------
// Left side panel – view and filter widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Supply Explorer");
    ui.separator();

    if state.properties.is_none() && state.ratios.is_none() {
        ui.label("No data loaded (File → Open…).");
        ui.add_space(4.0);
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Data type selector ----
            ui.strong("Data type");
            for kind in DataKind::ALL {
                if ui.radio(state.kind == kind, kind.label()).clicked() {
                    state.set_kind(kind);
                }
            }
            ui.separator();

            // ---- Map settings ----
            egui::CollapsingHeader::new(RichText::new("Map Settings").strong())
                .id_salt("map_settings")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui
                        .checkbox(&mut state.show_boundaries, "Submarket boundaries")
                        .changed()
                    {
                        state.rebuild_view();
                    }
                    if ui
                        .checkbox(&mut state.show_heatmap, "Unit count heatmap")
                        .changed()
                    {
                        state.rebuild_view();
                    }
                    ui.add(
                        egui::Slider::new(&mut state.heat_radius, HEAT_RADIUS_RANGE)
                            .text("Heat radius"),
                    );
                    ui.add(
                        egui::Slider::new(&mut state.heat_blur, HEAT_BLUR_RANGE)
                            .text("Heat blur"),
                    );
                });
            ui.separator();

            // ---- Year-range buckets ----
            let n_selected = state.selected_buckets.len();
            let n_total = DateBucket::ALL.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Years  ({n_selected}/{n_total})")).strong(),
            )
            .id_salt("year_buckets")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_buckets();
                    }
                    if ui.small_button("None").clicked() {
                        state.select_no_buckets();
                    }
                });

                for bucket in DateBucket::ALL {
                    let mut checked = state.selected_buckets.contains(&bucket);
                    if ui.checkbox(&mut checked, bucket.label()).changed() {
                        state.toggle_bucket(bucket);
                    }
                }
            });
            ui.separator();

            // ---- Submarket selector ----
            ui.strong("Submarket");
            let names = submarket_names(state);
            let current = state
                .submarket
                .clone()
                .unwrap_or_else(|| "All".to_string());
            egui::ComboBox::from_id_salt("submarket_filter")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(state.submarket.is_none(), "All").clicked() {
                        state.set_submarket(None);
                    }
                    for name in &names {
                        let selected = state.submarket.as_deref() == Some(name.as_str());
                        if ui.selectable_label(selected, name).clicked() {
                            state.set_submarket(Some(name.clone()));
                        }
                    }
                });
        });
}

/// Submarket names for the active view's dataset.
fn submarket_names(state: &AppState) -> Vec<String> {
    match state.kind {
        DataKind::Ratio => state
            .ratios
            .as_ref()
            .map(|ds| ds.submarkets.clone())
            .unwrap_or_default(),
        DataKind::Starts | DataKind::Deliveries => state
            .properties
            .as_ref()
            .map(|ds| ds.submarkets.clone())
            .unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open Properties…").clicked() {
                open_properties_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open Demand/Supply…").clicked() {
                open_ratios_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open Boundaries…").clicked() {
                open_boundaries_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match state.kind {
            DataKind::Ratio => {
                if let Some(ds) = &state.ratios {
                    ui.label(format!("{} demand/supply rows loaded", ds.len()));
                }
            }
            DataKind::Starts | DataKind::Deliveries => {
                if let Some(ds) = &state.properties {
                    ui.label(format!(
                        "{} properties loaded, {} shown",
                        ds.len(),
                        state.view.points.len()
                    ));
                }
            }
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Stats bar
// ---------------------------------------------------------------------------

/// Render the summary scalars under the map.
pub fn stats_bar(ui: &mut Ui, state: &AppState) {
    match &state.view.stats {
        ViewStats::Properties { summary, by_bucket } => {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.strong(format!("{} properties", summary.properties));
                ui.separator();
                ui.strong(format!("{} units", summary.units));
                ui.separator();
                ui.label(format!("{:.0} units/property", summary.avg_units));
                if let Some(pct) = summary.pct_of_expected {
                    ui.separator();
                    ui.label(format!("{pct:.0}% of historical pace"));
                }
                for (bucket, units) in by_bucket {
                    ui.separator();
                    ui.label(format!("{}: {units} units", bucket.label()));
                }
            });
        }
        ViewStats::Ratios { spread, ratios } => {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                match spread {
                    Some(s) => {
                        ui.strong(format!("{} submarkets", ratios.len()));
                        ui.separator();
                        ui.label(format!(
                            "demand/supply min {:.2} · avg {:.2} · max {:.2}",
                            s.min, s.avg, s.max
                        ));
                        for r in ratios {
                            ui.separator();
                            ui.label(format!("{} {:.2}", r.submarket, r.ratio));
                        }
                    }
                    None => {
                        ui.label("No demand/supply rows in the current selection.");
                    }
                }
            });
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_properties_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open property pipeline")
        .add_filter("Tabular files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_properties_file(&path);
    }
}

pub fn open_ratios_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open demand/supply table")
        .add_filter("Tabular files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_ratios_file(&path);
    }
}

pub fn open_boundaries_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open submarket boundaries")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        state.load_boundaries_file(&path);
    }
}
