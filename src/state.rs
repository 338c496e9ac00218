use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::data::filter::FilterSelection;
use crate::data::loader;
use crate::data::model::{BoundarySet, DataKind, DateBucket, PropertyDataset, RatioDataset};
use crate::layers::{self, MapView, ViewRequest};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Slider range for the heat sample radius, in screen points.
pub const HEAT_RADIUS_RANGE: RangeInclusive<f32> = 5.0..=50.0;
/// Slider range for the heat blur softening.
pub const HEAT_BLUR_RANGE: RangeInclusive<f32> = 1.0..=30.0;

const DEFAULT_HEAT_RADIUS: f32 = 15.0;
const DEFAULT_HEAT_BLUR: f32 = 7.0;

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded property pipeline (None until a file is opened).
    pub properties: Option<PropertyDataset>,

    /// Loaded per-submarket demand/supply table.
    pub ratios: Option<RatioDataset>,

    /// Loaded submarket boundary polygons.
    pub boundaries: Option<BoundarySet>,

    /// Which dashboard view is active.
    pub kind: DataKind,

    /// Selected year-range buckets.
    pub selected_buckets: BTreeSet<DateBucket>,

    /// Selected submarket, or None for all of them.
    pub submarket: Option<String>,

    /// Draw the boundary overlay.
    pub show_boundaries: bool,

    /// Draw the unit-weighted heat layer (property views only).
    pub show_heatmap: bool,

    /// Heat sample radius in screen points.
    pub heat_radius: f32,

    /// Heat sample softening.
    pub heat_blur: f32,

    /// Derived map view for the current selection (cached).
    pub view: MapView,

    /// The map should snap to `view.viewport` on the next frame.
    pub viewport_dirty: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let kind = DataKind::Deliveries;
        let selected_buckets = BTreeSet::from([DateBucket::ALL[0]]);

        let selection = FilterSelection {
            buckets: selected_buckets.clone(),
            submarket: None,
            mode: kind.date_mode(),
        };
        let view = layers::build_view(&ViewRequest {
            kind,
            selection: &selection,
            properties: None,
            ratios: None,
            boundaries: None,
            show_boundaries: true,
            show_heatmap: true,
        });

        Self {
            properties: None,
            ratios: None,
            boundaries: None,
            kind,
            selected_buckets,
            submarket: None,
            show_boundaries: true,
            show_heatmap: true,
            heat_radius: DEFAULT_HEAT_RADIUS,
            heat_blur: DEFAULT_HEAT_BLUR,
            view,
            viewport_dirty: true,
            status_message: None,
        }
    }
}

impl AppState {
    /// The filter request for the current UI selections.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            buckets: self.selected_buckets.clone(),
            submarket: self.submarket.clone(),
            mode: self.kind.date_mode(),
        }
    }

    /// Recompute the derived view. Call after any change that affects it.
    pub fn rebuild_view(&mut self) {
        let selection = self.selection();
        self.view = layers::build_view(&ViewRequest {
            kind: self.kind,
            selection: &selection,
            properties: self.properties.as_ref(),
            ratios: self.ratios.as_ref(),
            boundaries: self.boundaries.as_ref(),
            show_boundaries: self.show_boundaries,
            show_heatmap: self.show_heatmap,
        });
    }

    /// Rebuild and snap the map back to the selection's viewport.
    fn rebuild_and_refocus(&mut self) {
        self.rebuild_view();
        self.viewport_dirty = true;
    }

    /// Switch the dashboard view.
    pub fn set_kind(&mut self, kind: DataKind) {
        if self.kind != kind {
            self.kind = kind;
            self.rebuild_and_refocus();
        }
    }

    /// Select one submarket, or None for all.
    pub fn set_submarket(&mut self, submarket: Option<String>) {
        if self.submarket != submarket {
            self.submarket = submarket;
            self.rebuild_and_refocus();
        }
    }

    /// Flip one bucket in the year selection.
    pub fn toggle_bucket(&mut self, bucket: DateBucket) {
        if !self.selected_buckets.remove(&bucket) {
            self.selected_buckets.insert(bucket);
        }
        self.rebuild_and_refocus();
    }

    /// Select every bucket in the table.
    pub fn select_all_buckets(&mut self) {
        self.selected_buckets = DateBucket::ALL.into_iter().collect();
        self.rebuild_and_refocus();
    }

    /// Clear the bucket selection.
    pub fn select_no_buckets(&mut self) {
        self.selected_buckets.clear();
        self.rebuild_and_refocus();
    }

    // -- Loading --

    /// Load a property file, replacing the current table. A failure becomes
    /// the status message and leaves the old table in place.
    pub fn load_properties_file(&mut self, path: &Path) {
        match loader::load_properties(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} properties ({} submarkets) from {}",
                    dataset.len(),
                    dataset.submarkets.len(),
                    path.display()
                );
                self.properties = Some(dataset);
                self.status_message = None;
                self.rebuild_and_refocus();
            }
            Err(e) => self.report_load_error(path, &e),
        }
    }

    /// Load a demand/supply file, replacing the current table.
    pub fn load_ratios_file(&mut self, path: &Path) {
        match loader::load_ratios(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} ratio rows ({} submarkets) from {}",
                    dataset.len(),
                    dataset.submarkets.len(),
                    path.display()
                );
                self.ratios = Some(dataset);
                self.status_message = None;
                self.rebuild_and_refocus();
            }
            Err(e) => self.report_load_error(path, &e),
        }
    }

    /// Load a boundary GeoJSON, replacing the current polygons.
    pub fn load_boundaries_file(&mut self, path: &Path) {
        match loader::load_boundaries(path) {
            Ok(set) => {
                log::info!("Loaded {} boundaries from {}", set.len(), path.display());
                self.boundaries = Some(set);
                self.status_message = None;
                self.rebuild_view();
            }
            Err(e) => self.report_load_error(path, &e),
        }
    }

    fn report_load_error(&mut self, path: &Path, error: &anyhow::Error) {
        log::error!("Failed to load {}: {error:#}", path.display());
        self.status_message = Some(format!("Error: {error:#}"));
    }

    /// Try the bundled default files once at startup. Absent files are
    /// logged and noted in the status line, never an error. Load failures
    /// are collected across all three files so a later success cannot
    /// erase an earlier one's message.
    pub fn load_default_data(&mut self, dir: &Path) {
        let properties = dir.join("denver_pipeline.csv");
        let ratios = dir.join("denver_demand_supply.csv");
        let boundaries = dir.join("denver_submarkets.geojson");

        let mut missing = Vec::new();
        let mut errors = Vec::new();

        if properties.exists() {
            self.load_properties_file(&properties);
            if let Some(error) = self.status_message.take() {
                errors.push(error);
            }
        } else {
            missing.push("denver_pipeline.csv");
        }
        if ratios.exists() {
            self.load_ratios_file(&ratios);
            if let Some(error) = self.status_message.take() {
                errors.push(error);
            }
        } else {
            missing.push("denver_demand_supply.csv");
        }
        if boundaries.exists() {
            self.load_boundaries_file(&boundaries);
            if let Some(error) = self.status_message.take() {
                errors.push(error);
            }
        } else {
            missing.push("denver_submarkets.geojson");
        }

        if !missing.is_empty() {
            log::info!("No default {} under {}", missing.join(", "), dir.display());
        }
        self.status_message = if !errors.is_empty() {
            Some(errors.join("; "))
        } else if !missing.is_empty() {
            Some(format!("No {} found (File → Open…)", missing.join(", ")))
        } else {
            None
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DateMode, PropertyRecord};
    use crate::layers::ViewStats;

    fn record(name: &str, submarket: &str, units: u32, completion_year: i32) -> PropertyRecord {
        PropertyRecord {
            name: name.into(),
            submarket: submarket.into(),
            latitude: 39.7,
            longitude: -105.0,
            unit_count: units,
            status: "Under Construction".into(),
            start_bucket: DateBucket::for_year(completion_year - 2),
            completion_bucket: DateBucket::for_year(completion_year),
        }
    }

    #[test]
    fn defaults_show_first_delivery_bucket() {
        let state = AppState::default();
        assert_eq!(state.kind, DataKind::Deliveries);
        assert_eq!(
            state.selected_buckets,
            BTreeSet::from([DateBucket::ALL[0]])
        );
        assert_eq!(state.submarket, None);
        assert!(state.show_boundaries);
        assert!(state.show_heatmap);
        assert_eq!(state.heat_radius, 15.0);
        assert_eq!(state.heat_blur, 7.0);
        assert!(state.viewport_dirty);
    }

    #[test]
    fn selection_mode_follows_the_kind() {
        let mut state = AppState::default();
        state.set_kind(DataKind::Starts);
        assert_eq!(state.selection().mode, DateMode::Start);
        state.set_kind(DataKind::Deliveries);
        assert_eq!(state.selection().mode, DateMode::Completion);
    }

    #[test]
    fn toggling_a_bucket_rebuilds_the_view() {
        let mut state = AppState::default();
        state.properties = Some(PropertyDataset::from_records(vec![
            record("A", "Aurora", 100, 2019),
            record("B", "Aurora", 50, 2022),
        ]));
        state.rebuild_view();
        // Default selection is the first bucket only.
        assert_eq!(state.view.points.len(), 1);

        state.toggle_bucket(DateBucket::ALL[1]);
        assert_eq!(state.view.points.len(), 2);

        state.select_no_buckets();
        assert!(state.view.points.is_empty());

        state.select_all_buckets();
        assert_eq!(state.view.points.len(), 2);
    }

    #[test]
    fn switching_to_ratio_mode_switches_the_stats_shape() {
        let mut state = AppState::default();
        state.set_kind(DataKind::Ratio);
        match state.view.stats {
            ViewStats::Ratios { .. } => {}
            ViewStats::Properties { .. } => panic!("expected ratio stats"),
        }
    }

    #[test]
    fn default_data_load_errors_survive_later_successes() {
        let pipeline = "\
PropertyName,SubmarketName,YearStart,YearComplete,UnitCount,Latitude,Longitude,ConstructionStatus
,Aurora,2021,2023,50,39.71,-104.82,Delivered
";
        let demand_supply = "\
SubmarketName,YearRange,Demand,Supply
Aurora,2018-2020,30.0,10.0
";
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("denver_pipeline.csv"), pipeline).unwrap();
        std::fs::write(dir.path().join("denver_demand_supply.csv"), demand_supply).unwrap();

        let mut state = AppState::default();
        state.load_default_data(dir.path());

        // The ratio table loaded cleanly, but the property failure still
        // reaches the status line.
        assert!(state.properties.is_none());
        assert!(state.ratios.is_some());
        let status = state.status_message.as_deref().unwrap_or_default();
        assert!(status.starts_with("Error:"), "status was: {status}");
        assert!(status.contains("property file"), "status was: {status}");
    }
}
