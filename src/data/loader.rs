use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use geo::MultiPolygon;
use geojson::GeoJson;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{
    BoundarySet, DateBucket, PropertyDataset, PropertyRecord, RatioDataset, RatioRecord,
    SubmarketPolygon,
};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the property pipeline table. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source export's column names
/// * `.parquet` – the same columns as flat Arrow arrays
pub fn load_properties(path: &Path) -> Result<PropertyDataset> {
    let ext = extension(path);
    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening property CSV")?;
            read_properties_csv(file)
        }
        "parquet" | "pq" => {
            let file = std::fs::File::open(path).context("opening property parquet")?;
            read_properties_parquet(file)
        }
        other => bail!("Unsupported property file extension: .{other}"),
    }
}

/// Load the per-submarket demand/supply table. Dispatch by extension.
pub fn load_ratios(path: &Path) -> Result<RatioDataset> {
    let ext = extension(path);
    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening ratio CSV")?;
            read_ratios_csv(file)
        }
        "parquet" | "pq" => {
            let file = std::fs::File::open(path).context("opening ratio parquet")?;
            read_ratios_parquet(file)
        }
        other => bail!("Unsupported ratio file extension: .{other}"),
    }
}

/// Load submarket boundaries from a GeoJSON FeatureCollection.
pub fn load_boundaries(path: &Path) -> Result<BoundarySet> {
    let text = std::fs::read_to_string(path).context("reading boundary GeoJSON")?;
    parse_boundaries(&text)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// CSV loaders
// ---------------------------------------------------------------------------

/// Raw property row as exported. `YearStart`/`YearComplete` may be blank for
/// proposed or unscheduled projects.
#[derive(Debug, Deserialize)]
struct PropertyRow {
    #[serde(rename = "PropertyName")]
    name: String,
    #[serde(rename = "SubmarketName")]
    submarket: String,
    #[serde(rename = "YearStart")]
    year_start: Option<i32>,
    #[serde(rename = "YearComplete")]
    year_complete: Option<i32>,
    #[serde(rename = "UnitCount")]
    unit_count: u32,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "ConstructionStatus")]
    status: String,
}

impl PropertyRow {
    /// Convert to a record, bucketing the year columns. `None` for rows that
    /// can't be placed on the map or named.
    fn into_record(self) -> Option<PropertyRecord> {
        let name = self.name.trim().to_string();
        let submarket = self.submarket.trim_end().to_string();
        if name.is_empty() || submarket.is_empty() {
            return None;
        }
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return None;
        }
        Some(PropertyRecord {
            name,
            submarket,
            latitude: self.latitude,
            longitude: self.longitude,
            unit_count: self.unit_count,
            status: self.status.trim().to_string(),
            start_bucket: self.year_start.and_then(DateBucket::for_year),
            completion_bucket: self.year_complete.and_then(DateBucket::for_year),
        })
    }
}

/// Parse property rows from CSV. Malformed rows are skipped with a warning;
/// a file where nothing parses at all is an error.
fn read_properties_csv<R: Read>(input: R) -> Result<PropertyDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let mut records = Vec::new();
    let mut seen = 0usize;
    let mut skipped = 0usize;

    for (row_no, result) in reader.deserialize::<PropertyRow>().enumerate() {
        seen += 1;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Skipping property row {row_no}: {e}");
                skipped += 1;
                continue;
            }
        };
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                log::warn!("Skipping property row {row_no}: missing name, submarket, or location");
                skipped += 1;
            }
        }
    }

    if seen > 0 && records.is_empty() {
        bail!("No usable rows in property file ({seen} rows, {skipped} skipped)");
    }
    Ok(PropertyDataset::from_records(records))
}

/// Demand and supply are quantities: finite and non-negative.
fn non_negative(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Raw demand/supply row: one submarket, one year-range bucket.
#[derive(Debug, Deserialize)]
struct RatioRow {
    #[serde(rename = "SubmarketName")]
    submarket: String,
    #[serde(rename = "YearRange")]
    year_range: String,
    #[serde(rename = "Demand")]
    demand: f64,
    #[serde(rename = "Supply")]
    supply: f64,
}

impl RatioRow {
    fn into_record(self) -> Option<RatioRecord> {
        let submarket = self.submarket.trim_end().to_string();
        if submarket.is_empty() {
            return None;
        }
        let bucket: DateBucket = self.year_range.parse().ok()?;
        Some(RatioRecord {
            submarket,
            bucket,
            demand: non_negative(self.demand)?,
            supply: non_negative(self.supply)?,
        })
    }
}

fn read_ratios_csv<R: Read>(input: R) -> Result<RatioDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();
    let mut seen = 0usize;
    let mut skipped = 0usize;

    for (row_no, result) in reader.deserialize::<RatioRow>().enumerate() {
        seen += 1;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Skipping ratio row {row_no}: {e}");
                skipped += 1;
                continue;
            }
        };
        match row.into_record() {
            Some(record) => rows.push(record),
            None => {
                log::warn!(
                    "Skipping ratio row {row_no}: missing submarket, unknown year range, or invalid demand/supply"
                );
                skipped += 1;
            }
        }
    }

    if seen > 0 && rows.is_empty() {
        bail!("No usable rows in ratio file ({seen} rows, {skipped} skipped)");
    }
    Ok(RatioDataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Parquet loaders
// ---------------------------------------------------------------------------

/// The property columns of one record batch.
struct PropertyColumns<'a> {
    name: &'a ArrayRef,
    submarket: &'a ArrayRef,
    year_start: &'a ArrayRef,
    year_complete: &'a ArrayRef,
    unit_count: &'a ArrayRef,
    latitude: &'a ArrayRef,
    longitude: &'a ArrayRef,
    status: &'a ArrayRef,
}

impl PropertyColumns<'_> {
    fn record(&self, row: usize) -> Option<PropertyRecord> {
        let name = string_at(self.name, row)?.trim().to_string();
        let submarket = string_at(self.submarket, row)?.trim_end().to_string();
        if name.is_empty() || submarket.is_empty() {
            return None;
        }
        let latitude = float_at(self.latitude, row)?;
        let longitude = float_at(self.longitude, row)?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        let unit_count = u32::try_from(int_at(self.unit_count, row)?).ok()?;
        Some(PropertyRecord {
            name,
            submarket,
            latitude,
            longitude,
            unit_count,
            status: string_at(self.status, row).unwrap_or_default().trim().to_string(),
            start_bucket: year_bucket(self.year_start, row),
            completion_bucket: year_bucket(self.year_complete, row),
        })
    }
}

fn read_properties_parquet(file: std::fs::File) -> Result<PropertyDataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut seen = 0usize;
    let mut skipped = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let index_of = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        let columns = PropertyColumns {
            name: batch.column(index_of("PropertyName")?),
            submarket: batch.column(index_of("SubmarketName")?),
            year_start: batch.column(index_of("YearStart")?),
            year_complete: batch.column(index_of("YearComplete")?),
            unit_count: batch.column(index_of("UnitCount")?),
            latitude: batch.column(index_of("Latitude")?),
            longitude: batch.column(index_of("Longitude")?),
            status: batch.column(index_of("ConstructionStatus")?),
        };

        seen += batch.num_rows();
        for row in 0..batch.num_rows() {
            match columns.record(row) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }
    }

    if seen > 0 && records.is_empty() {
        bail!("No usable rows in property file ({seen} rows, {skipped} skipped)");
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} property rows with missing or invalid fields");
    }
    Ok(PropertyDataset::from_records(records))
}

fn read_ratios_parquet(file: std::fs::File) -> Result<RatioDataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    let mut seen = 0usize;
    let mut skipped = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let index_of = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };

        let submarket_col = batch.column(index_of("SubmarketName")?);
        let range_col = batch.column(index_of("YearRange")?);
        let demand_col = batch.column(index_of("Demand")?);
        let supply_col = batch.column(index_of("Supply")?);

        seen += batch.num_rows();
        for row in 0..batch.num_rows() {
            let parsed = (|| {
                let submarket = string_at(submarket_col, row)?.trim_end().to_string();
                if submarket.is_empty() {
                    return None;
                }
                let bucket: DateBucket = string_at(range_col, row)?.parse().ok()?;
                Some(RatioRecord {
                    submarket,
                    bucket,
                    demand: non_negative(float_at(demand_col, row)?)?,
                    supply: non_negative(float_at(supply_col, row)?)?,
                })
            })();
            match parsed {
                Some(record) => rows.push(record),
                None => skipped += 1,
            }
        }
    }

    if seen > 0 && rows.is_empty() {
        bail!("No usable rows in ratio file ({seen} rows, {skipped} skipped)");
    }
    if skipped > 0 {
        log::warn!("Skipped {skipped} ratio rows with missing or invalid fields");
    }
    Ok(RatioDataset::from_rows(rows))
}

// -- Arrow column helpers --

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

fn int_at(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| i64::from(a.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        _ => None,
    }
}

fn float_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int32 | DataType::Int64 => int_at(col, row).map(|i| i as f64),
        _ => None,
    }
}

fn year_bucket(col: &ArrayRef, row: usize) -> Option<DateBucket> {
    let year = int_at(col, row)?;
    let year = i32::try_from(year).ok()?;
    DateBucket::for_year(year)
}

// ---------------------------------------------------------------------------
// GeoJSON boundary loader
// ---------------------------------------------------------------------------

/// Parse a FeatureCollection of submarket boundaries.
///
/// Feature properties carry the submarket under `SubName` (or `Submarket`)
/// and the metro under `CBSAName` (or `Market`). Polygon geometries are
/// wrapped into a single-member MultiPolygon. Features with no usable name
/// or geometry are skipped with a warning, never fatal.
fn parse_boundaries(text: &str) -> Result<BoundarySet> {
    let geojson: GeoJson = text.parse().context("parsing boundary GeoJSON")?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        bail!("Expected a GeoJSON FeatureCollection of submarket boundaries");
    };

    let mut polygons = Vec::new();
    for feature in collection.features {
        let Some(submarket) = feature_string(&feature, &["SubName", "Submarket"]) else {
            log::warn!("Skipping boundary feature without a submarket name");
            continue;
        };
        let market = feature_string(&feature, &["CBSAName", "Market"]).unwrap_or_default();
        let Some(boundary) = feature_multipolygon(feature.geometry) else {
            log::warn!("Skipping boundary for {submarket}: unusable geometry");
            continue;
        };
        polygons.push(SubmarketPolygon {
            submarket,
            market,
            boundary,
        });
    }

    Ok(BoundarySet::from_polygons(polygons))
}

/// First non-empty string property under any of the given keys, with
/// trailing whitespace trimmed.
fn feature_string(feature: &geojson::Feature, keys: &[&str]) -> Option<String> {
    let properties = feature.properties.as_ref()?;
    for key in keys {
        if let Some(serde_json::Value::String(s)) = properties.get(*key) {
            let trimmed = s.trim_end();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Convert a feature geometry into a [`MultiPolygon`]. Handles both
/// `Polygon` and `MultiPolygon`; anything else is unusable.
fn feature_multipolygon(geometry: Option<geojson::Geometry>) -> Option<MultiPolygon<f64>> {
    let geometry = geometry?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::DateMode;

    #[test]
    fn parses_property_csv_and_buckets_years() {
        let csv = "\
PropertyName,SubmarketName,YearStart,YearComplete,UnitCount,Latitude,Longitude,ConstructionStatus
The Pullman,Five Points,2019,2021,240,39.7553,-104.9748,Delivered
Skyline Flats,Capitol Hill ,2024,2026,180,39.7312,-104.9803,Under Construction
Old Mill Lofts,Highland,2015,2016,90,39.7621,-105.0125,Delivered
";
        let ds = read_properties_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);

        let pullman = &ds.records[0];
        assert_eq!(pullman.start_bucket, DateBucket::for_year(2019));
        assert_eq!(pullman.completion_bucket, DateBucket::for_year(2021));

        // Trailing whitespace in submarket names is trimmed at load.
        assert_eq!(ds.records[1].submarket, "Capitol Hill");

        // Years before the bucket table leave no bucket.
        assert_eq!(ds.records[2].start_bucket, None);
        assert_eq!(ds.records[2].completion_bucket, None);

        assert_eq!(ds.submarkets.len(), 3);
        assert_eq!(ds.buckets_present(DateMode::Start).len(), 2);
    }

    #[test]
    fn blank_years_leave_no_bucket() {
        let csv = "\
PropertyName,SubmarketName,YearStart,YearComplete,UnitCount,Latitude,Longitude,ConstructionStatus
Paper Mill,Aurora,,2027,300,39.7100,-104.8250,Proposed
";
        let ds = read_properties_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].start_bucket, None);
        assert_eq!(
            ds.records[0].completion_bucket,
            DateBucket::for_year(2027)
        );
    }

    #[test]
    fn malformed_property_rows_are_skipped() {
        let csv = "\
PropertyName,SubmarketName,YearStart,YearComplete,UnitCount,Latitude,Longitude,ConstructionStatus
Good Tower,Aurora,2021,2023,100,39.71,-104.82,Delivered
Bad Units,Aurora,2021,2023,not-a-number,39.71,-104.82,Delivered
,Aurora,2021,2023,50,39.71,-104.82,Delivered
";
        let ds = read_properties_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].name, "Good Tower");
    }

    #[test]
    fn a_file_with_no_usable_rows_is_an_error() {
        let csv = "\
PropertyName,SubmarketName,YearStart,YearComplete,UnitCount,Latitude,Longitude,ConstructionStatus
,Aurora,2021,2023,50,39.71,-104.82,Delivered
";
        assert!(read_properties_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn an_empty_property_file_is_just_empty() {
        let csv =
            "PropertyName,SubmarketName,YearStart,YearComplete,UnitCount,Latitude,Longitude,ConstructionStatus\n";
        let ds = read_properties_csv(csv.as_bytes()).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn parses_ratio_csv_and_skips_unknown_ranges() {
        let csv = "\
SubmarketName,YearRange,Demand,Supply
Five Points,2018-2020,120.5,98.0
Five Points,2021-2022,88.0,110.0
Glendale,1990-1999,10.0,10.0
";
        let ds = read_ratios_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.submarkets, vec!["Five Points".to_string()]);
        assert_eq!(ds.rows[0].bucket.label(), "2018-2020");
    }

    #[test]
    fn negative_demand_or_supply_rows_are_skipped() {
        // A negative supply must not masquerade as the zero-supply fallback.
        let csv = "\
SubmarketName,YearRange,Demand,Supply
Five Points,2018-2020,-30.0,10.0
Capitol Hill,2018-2020,30.0,-10.0
Highland,2018-2020,NaN,10.0
Aurora,2018-2020,30.0,10.0
";
        let ds = read_ratios_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows[0].submarket, "Aurora");
    }

    fn write_parquet(path: &Path, schema: Arc<Schema>, batch: &RecordBatch) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
    }

    fn ratio_batch(rows: &[(&str, &str, f64, f64)]) -> (Arc<Schema>, RecordBatch) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("SubmarketName", DataType::Utf8, false),
            Field::new("YearRange", DataType::Utf8, false),
            Field::new("Demand", DataType::Float64, false),
            Field::new("Supply", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(
                    rows.iter().map(|r| r.0).collect::<Vec<_>>(),
                )),
                Arc::new(StringArray::from(
                    rows.iter().map(|r| r.1).collect::<Vec<_>>(),
                )),
                Arc::new(Float64Array::from(
                    rows.iter().map(|r| r.2).collect::<Vec<_>>(),
                )),
                Arc::new(Float64Array::from(
                    rows.iter().map(|r| r.3).collect::<Vec<_>>(),
                )),
            ],
        )
        .unwrap();
        (schema, batch)
    }

    #[test]
    fn parses_ratio_parquet_and_skips_invalid_rows() {
        let (schema, batch) = ratio_batch(&[
            ("Five Points", "2018-2020", 120.5, 98.0),
            ("Capitol Hill", "2018-2020", -30.0, 10.0),
            ("", "2018-2020", 30.0, 10.0),
            ("Glendale", "1990-1999", 10.0, 10.0),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratios.parquet");
        write_parquet(&path, schema, &batch);

        let ds = load_ratios(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows[0].submarket, "Five Points");
    }

    #[test]
    fn an_all_skipped_ratio_parquet_is_an_error() {
        let (schema, batch) = ratio_batch(&[("Aurora", "2018-2020", 30.0, -10.0)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratios.parquet");
        write_parquet(&path, schema, &batch);

        assert!(load_ratios(&path).is_err());
    }

    #[test]
    fn an_all_skipped_property_parquet_is_an_error() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("PropertyName", DataType::Utf8, false),
            Field::new("SubmarketName", DataType::Utf8, false),
            Field::new("YearStart", DataType::Int32, true),
            Field::new("YearComplete", DataType::Int32, true),
            Field::new("UnitCount", DataType::Int64, false),
            Field::new("Latitude", DataType::Float64, false),
            Field::new("Longitude", DataType::Float64, false),
            Field::new("ConstructionStatus", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![""])),
                Arc::new(StringArray::from(vec!["Aurora"])),
                Arc::new(Int32Array::from(vec![2021])),
                Arc::new(Int32Array::from(vec![2023])),
                Arc::new(Int64Array::from(vec![50i64])),
                Arc::new(Float64Array::from(vec![39.71])),
                Arc::new(Float64Array::from(vec![-104.82])),
                Arc::new(StringArray::from(vec!["Delivered"])),
            ],
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.parquet");
        write_parquet(&path, schema, &batch);

        assert!(load_properties(&path).is_err());
    }

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"SubName": "Five Points ", "CBSAName": "Denver"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-105.0, 39.74], [-104.96, 39.74], [-104.96, 39.77], [-105.0, 39.77], [-105.0, 39.74]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"Submarket": "Aurora", "Market": "Denver"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-104.85, 39.69], [-104.80, 39.69], [-104.80, 39.73], [-104.85, 39.73], [-104.85, 39.69]]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"SubName": "Pointy Place"},
                "geometry": {"type": "Point", "coordinates": [-104.9, 39.7]}
            },
            {
                "type": "Feature",
                "properties": {"Acreage": 12},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-105.0, 39.74], [-104.96, 39.74], [-104.96, 39.77], [-105.0, 39.74]]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_boundaries_and_skips_unusable_features() {
        let set = parse_boundaries(BOUNDARIES).unwrap();
        // The point geometry and the nameless feature are skipped.
        assert_eq!(set.len(), 2);

        let five_points = set.get("Five Points").unwrap();
        assert_eq!(five_points.submarket, "Five Points");
        assert_eq!(five_points.market, "Denver");
        assert_eq!(five_points.boundary.0.len(), 1);

        // Alternate property keys also resolve.
        assert!(set.get("Aurora").is_some());
    }

    #[test]
    fn a_bare_geometry_is_not_a_boundary_file() {
        let text = r#"{"type": "Point", "coordinates": [-104.9, 39.7]}"#;
        assert!(parse_boundaries(text).is_err());
    }
}
