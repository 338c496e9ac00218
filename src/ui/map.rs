use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoints, Points, Polygon};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Map plot (central panel)
// ---------------------------------------------------------------------------

const PROPERTY_MARKER: Color32 = Color32::from_rgb(220, 20, 60);
const PROPERTY_MARKER_RADIUS: f32 = 4.0;

/// Render the map in the central panel.
pub fn map_plot(ui: &mut Ui, state: &mut AppState) {
    if state.properties.is_none() && state.ratios.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open data to view the map  (File → Open…)");
        });
        return;
    }

    let snap_viewport = state.viewport_dirty;
    state.viewport_dirty = false;
    let heat_radius = state.heat_radius;
    let heat_blur = state.heat_blur;
    let view = &state.view;

    // One degree of longitude is cos(latitude) as wide as one of latitude.
    let lat_cos = view.viewport.center[1].to_radians().cos();
    let aspect = (1.0 / lat_cos) as f32;

    Plot::new("supply_map")
        .data_aspect(aspect)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // Snap to the selection's viewport once, then leave the user
            // free to pan.
            if snap_viewport {
                let viewport = view.viewport;
                let half_lat = viewport.lat_span() / 2.0;
                let half_lon = half_lat / lat_cos;
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [viewport.center[0] - half_lon, viewport.center[1] - half_lat],
                    [viewport.center[0] + half_lon, viewport.center[1] + half_lat],
                ));
            }

            // ---- Boundary polygons ----
            for shape in &view.boundaries {
                for ring in &shape.rings {
                    let points: PlotPoints = ring.iter().copied().collect();
                    let polygon = Polygon::new(points)
                        .name(&shape.submarket)
                        .fill_color(shape.fill)
                        .stroke(Stroke::new(1.5, shape.stroke));
                    plot_ui.polygon(polygon);
                }
            }

            // ---- Heat splats ----
            if let Some(heat) = &view.heat {
                for sample in &heat.samples {
                    let color = heat.gradient.color_at(sample.weight);
                    let intensity = heat.intensity(sample.weight);
                    // Blur softens splats by lowering their alpha.
                    let alpha =
                        (200.0 * intensity as f32 / heat_blur.sqrt()).clamp(16.0, 200.0) as u8;
                    let splat = Points::new(vec![sample.position])
                        .radius(heat_radius)
                        .color(Color32::from_rgba_unmultiplied(
                            color.r(),
                            color.g(),
                            color.b(),
                            alpha,
                        ));
                    plot_ui.points(splat);
                }
            }

            // ---- Property markers ----
            for point in &view.points {
                let marker = Points::new(vec![point.position])
                    .name(&point.label)
                    .radius(PROPERTY_MARKER_RADIUS)
                    .color(PROPERTY_MARKER);
                plot_ui.points(marker);
            }
        });
}
