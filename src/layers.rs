use std::collections::BTreeMap;

use eframe::egui::Color32;
use geo::{Centroid, MultiPolygon};

use crate::color::{self, HeatGradient};
use crate::data::filter::{self, FilterSelection};
use crate::data::metrics::{self, RatioStats, SummaryStats};
use crate::data::model::{
    BoundarySet, DataKind, DateBucket, DateMode, PropertyDataset, PropertyRecord, RatioDataset,
    RatioRecord, SubmarketRatio,
};

// ---------------------------------------------------------------------------
// Styled layers consumed by the map renderer
// ---------------------------------------------------------------------------

/// Overlay fill for the property views (steel blue, made translucent).
const PROPERTY_FILL: Color32 = Color32::from_rgb(70, 130, 180);
/// Alpha applied to every polygon fill.
const FILL_ALPHA: u8 = 60;

const METRO_ZOOM: f64 = 10.0;
const SUBMARKET_ZOOM: f64 = 12.0;

/// A submarket boundary ready to draw: exterior rings in plot coordinates
/// (x = longitude, y = latitude). Interior holes are not drawn.
#[derive(Debug, Clone)]
pub struct BoundaryShape {
    pub submarket: String,
    pub rings: Vec<Vec<[f64; 2]>>,
    pub fill: Color32,
    pub stroke: Color32,
}

/// One property marker with its hover text.
#[derive(Debug, Clone)]
pub struct PropertyPoint {
    pub position: [f64; 2],
    pub units: u32,
    pub label: String,
}

/// One heat sample. `weight` is the property's share of total filtered
/// units, so weights across a layer sum to 1.
#[derive(Debug, Clone, Copy)]
pub struct HeatSample {
    pub position: [f64; 2],
    pub weight: f64,
}

/// Weighted samples plus the gradient that colors them.
#[derive(Debug, Clone)]
pub struct HeatLayer {
    pub samples: Vec<HeatSample>,
    pub gradient: HeatGradient,
}

impl HeatLayer {
    /// Rendered intensity of one sample: its weight normalized by the top
    /// retained gradient stop, saturating at 1.
    pub fn intensity(&self, weight: f64) -> f64 {
        let max = self.gradient.max_stop();
        if max <= 0.0 {
            return 0.0;
        }
        (weight / max).min(1.0)
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Where the map looks. `zoom` follows the slippy-map convention: zoom z
/// shows 512 / 2^z degrees of latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    /// `[longitude, latitude]` of the view center.
    pub center: [f64; 2],
    pub zoom: f64,
}

impl MapViewport {
    /// Default view over the Denver core.
    pub fn metro() -> Self {
        MapViewport {
            center: [-105.0, 39.7309],
            zoom: METRO_ZOOM,
        }
    }

    /// Height of the viewport in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        512.0 / 2f64.powf(self.zoom)
    }
}

/// Viewport for the current selection. All submarkets means the fixed metro
/// view; a selected submarket centers on the mean position of its filtered
/// records, falling back to its boundary centroid when nothing is filtered.
pub fn viewport_for(
    submarket: Option<&str>,
    records: &[PropertyRecord],
    indices: &[usize],
    boundaries: Option<&BoundarySet>,
) -> MapViewport {
    let Some(name) = submarket else {
        return MapViewport::metro();
    };

    if !indices.is_empty() {
        let n = indices.len() as f64;
        let (lon, lat) = indices.iter().fold((0.0, 0.0), |(lon, lat), &i| {
            (lon + records[i].longitude, lat + records[i].latitude)
        });
        return MapViewport {
            center: [lon / n, lat / n],
            zoom: SUBMARKET_ZOOM,
        };
    }

    if let Some(centroid) = boundaries
        .and_then(|set| set.get(name))
        .and_then(|polygon| polygon.boundary.centroid())
    {
        return MapViewport {
            center: [centroid.x(), centroid.y()],
            zoom: SUBMARKET_ZOOM,
        };
    }

    MapViewport::metro()
}

// ---------------------------------------------------------------------------
// Layer builders
// ---------------------------------------------------------------------------

/// Style every boundary polygon. With `ratios` the fill comes from the
/// shared color scale, matched by trimmed submarket name; submarkets
/// without a filtered ratio keep the neutral fallback. Without `ratios`
/// (the property views) every polygon gets the same translucent fill.
pub fn boundary_shapes(
    boundaries: &BoundarySet,
    ratios: Option<&[SubmarketRatio]>,
) -> Vec<BoundaryShape> {
    let fills: BTreeMap<&str, Color32> = match ratios {
        Some(rows) => {
            let values: Vec<f64> = rows.iter().map(|r| r.ratio).collect();
            let hex = color::ratio_fill_colors(&values);
            rows.iter()
                .zip(hex.iter())
                .filter_map(|(row, hex)| {
                    color::parse_hex(hex).map(|c| (row.submarket.trim_end(), c))
                })
                .collect()
        }
        None => BTreeMap::new(),
    };
    let neutral = color::parse_hex(color::NEUTRAL_FILL).unwrap_or(Color32::GRAY);

    boundaries
        .polygons
        .iter()
        .map(|polygon| {
            let fill = match ratios {
                Some(_) => fills
                    .get(polygon.submarket.trim_end())
                    .copied()
                    .unwrap_or(neutral),
                None => PROPERTY_FILL,
            };
            BoundaryShape {
                submarket: polygon.submarket.clone(),
                rings: exterior_rings(&polygon.boundary),
                fill: with_alpha(fill, FILL_ALPHA),
                stroke: Color32::WHITE,
            }
        })
        .collect()
}

fn exterior_rings(boundary: &MultiPolygon<f64>) -> Vec<Vec<[f64; 2]>> {
    boundary
        .0
        .iter()
        .map(|polygon| {
            polygon
                .exterior()
                .points()
                .map(|p| [p.x(), p.y()])
                .collect()
        })
        .collect()
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Markers for the filtered properties, hover text carrying the fields the
/// map popups show.
pub fn property_points(
    records: &[PropertyRecord],
    indices: &[usize],
    mode: DateMode,
) -> Vec<PropertyPoint> {
    indices
        .iter()
        .map(|&i| {
            let record = &records[i];
            let bucket = record
                .bucket_for(mode)
                .map(|b| b.label())
                .unwrap_or_else(|| "unscheduled".to_string());
            PropertyPoint {
                position: [record.longitude, record.latitude],
                units: record.unit_count,
                label: format!(
                    "{}\n{} · {}\n{} units",
                    record.name, record.status, bucket, record.unit_count
                ),
            }
        })
        .collect()
}

/// Unit-weighted heat samples under the clamped gradient. `None` when the
/// filtered scope has no units. Without a defined unit ratio the gradient
/// stays unclamped.
pub fn heat_layer(
    records: &[PropertyRecord],
    indices: &[usize],
    unit_ratio: Option<f64>,
) -> Option<HeatLayer> {
    let total = metrics::total_units(records, indices);
    if total == 0 {
        return None;
    }
    let total = total as f64;

    let samples = indices
        .iter()
        .map(|&i| {
            let record = &records[i];
            HeatSample {
                position: [record.longitude, record.latitude],
                weight: f64::from(record.unit_count) / total,
            }
        })
        .collect();

    let gradient = match unit_ratio {
        Some(ratio) => HeatGradient::base().clamp_to(ratio),
        None => HeatGradient::base(),
    };
    Some(HeatLayer { samples, gradient })
}

// ---------------------------------------------------------------------------
// View assembly
// ---------------------------------------------------------------------------

/// Scalars and tables shown under the map.
#[derive(Debug, Clone)]
pub enum ViewStats {
    Properties {
        summary: SummaryStats,
        by_bucket: BTreeMap<DateBucket, u64>,
    },
    Ratios {
        spread: Option<RatioStats>,
        ratios: Vec<SubmarketRatio>,
    },
}

/// Everything the map and the stats bar draw for one selection.
#[derive(Debug, Clone)]
pub struct MapView {
    pub boundaries: Vec<BoundaryShape>,
    pub points: Vec<PropertyPoint>,
    pub heat: Option<HeatLayer>,
    pub viewport: MapViewport,
    pub stats: ViewStats,
}

/// Inputs for one view rebuild. Datasets stay `None` until loaded.
pub struct ViewRequest<'a> {
    pub kind: DataKind,
    pub selection: &'a FilterSelection,
    pub properties: Option<&'a PropertyDataset>,
    pub ratios: Option<&'a RatioDataset>,
    pub boundaries: Option<&'a BoundarySet>,
    pub show_boundaries: bool,
    pub show_heatmap: bool,
}

/// Assemble the full derived view in one pass: filter, metrics, colors,
/// layers, viewport. Pure; run on every selection change.
pub fn build_view(request: &ViewRequest<'_>) -> MapView {
    match request.kind {
        DataKind::Starts | DataKind::Deliveries => property_view(request),
        DataKind::Ratio => ratio_view(request),
    }
}

fn property_view(request: &ViewRequest<'_>) -> MapView {
    let selection = request.selection;
    let mode = selection.mode;

    let empty: &[PropertyRecord] = &[];
    let (records, historical_buckets) = match request.properties {
        Some(ds) => (ds.records.as_slice(), ds.buckets_present(mode).len()),
        None => (empty, 0),
    };

    let indices = filter::filtered_indices(records, selection);
    let filtered_units = metrics::total_units(records, &indices);
    let historical_units = metrics::historical_units(records, mode, selection.submarket.as_deref());
    let unit_ratio = metrics::unit_ratio(
        filtered_units as f64,
        historical_units as f64,
        selection.buckets.len(),
        historical_buckets,
    );

    let boundaries = match (request.show_boundaries, request.boundaries) {
        (true, Some(set)) => boundary_shapes(set, None),
        _ => Vec::new(),
    };
    let points = property_points(records, &indices, mode);
    let heat = if request.show_heatmap {
        heat_layer(records, &indices, unit_ratio)
    } else {
        None
    };
    let viewport = viewport_for(
        selection.submarket.as_deref(),
        records,
        &indices,
        request.boundaries,
    );
    let stats = ViewStats::Properties {
        summary: metrics::property_summary(records, &indices, unit_ratio),
        by_bucket: metrics::units_by_bucket(records, &indices, mode),
    };

    MapView {
        boundaries,
        points,
        heat,
        viewport,
        stats,
    }
}

fn ratio_view(request: &ViewRequest<'_>) -> MapView {
    let rows: &[RatioRecord] = request.ratios.map(|ds| ds.rows.as_slice()).unwrap_or(&[]);
    let aggregated = filter::aggregate_ratios(rows, request.selection);

    let boundaries = match (request.show_boundaries, request.boundaries) {
        (true, Some(set)) => boundary_shapes(set, Some(&aggregated)),
        _ => Vec::new(),
    };
    let viewport = viewport_for(
        request.selection.submarket.as_deref(),
        &[],
        &[],
        request.boundaries,
    );

    MapView {
        boundaries,
        points: Vec::new(),
        heat: None,
        viewport,
        stats: ViewStats::Ratios {
            spread: metrics::ratio_stats(&aggregated),
            ratios: aggregated,
        },
    }
}
