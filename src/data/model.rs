use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use geo::MultiPolygon;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DateBucket – a fixed year-range label grouping construction years
// ---------------------------------------------------------------------------

/// One of the fixed, ordered year ranges used to bucket construction dates.
///
/// The table is closed: a year either falls inside exactly one bucket or has
/// no bucket at all. Ordering follows the table position (earlier ranges
/// sort first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateBucket {
    pub start_year: i32,
    pub end_year: i32,
}

impl DateBucket {
    /// The full bucket table, oldest first.
    pub const ALL: [DateBucket; 5] = [
        DateBucket::new(2018, 2020),
        DateBucket::new(2021, 2022),
        DateBucket::new(2023, 2024),
        DateBucket::new(2025, 2026),
        DateBucket::new(2027, 2028),
    ];

    const fn new(start_year: i32, end_year: i32) -> Self {
        DateBucket {
            start_year,
            end_year,
        }
    }

    /// The bucket containing `year`, if any.
    pub fn for_year(year: i32) -> Option<DateBucket> {
        DateBucket::ALL
            .iter()
            .copied()
            .find(|b| b.start_year <= year && year <= b.end_year)
    }

    /// Range label as shown in the UI and in ratio files, e.g. `"2018-2020"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// Error for year-range labels that don't name a bucket in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized year range label: {0:?}")]
pub struct ParseBucketError(pub String);

impl FromStr for DateBucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = trimmed.split_once('-').and_then(|(start, end)| {
            let start: i32 = start.trim().parse().ok()?;
            let end: i32 = end.trim().parse().ok()?;
            DateBucket::ALL
                .iter()
                .copied()
                .find(|b| b.start_year == start && b.end_year == end)
        });
        parsed.ok_or_else(|| ParseBucketError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Date mode and data kind selectors
// ---------------------------------------------------------------------------

/// Which date column a filter reads: construction start or completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    Start,
    Completion,
}

/// The three dashboard views: construction starts, deliveries, or the
/// per-submarket demand/supply ratio choropleth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Starts,
    Deliveries,
    Ratio,
}

impl DataKind {
    pub const ALL: [DataKind; 3] = [DataKind::Starts, DataKind::Deliveries, DataKind::Ratio];

    /// UI label for the selector.
    pub fn label(self) -> &'static str {
        match self {
            DataKind::Starts => "Construction Starts",
            DataKind::Deliveries => "Deliveries",
            DataKind::Ratio => "Demand / Supply Ratio",
        }
    }

    /// The date column this view filters on. Ratio rows carry their own
    /// bucket, so the mode only matters for the property views; ratio mode
    /// reports `Completion` as a neutral default.
    pub fn date_mode(self) -> DateMode {
        match self {
            DataKind::Starts => DateMode::Start,
            DataKind::Deliveries | DataKind::Ratio => DateMode::Completion,
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyRecord – one row of the property pipeline table
// ---------------------------------------------------------------------------

/// A single property (one row of the pipeline file). Immutable once loaded;
/// buckets are derived from the year columns at load time.
#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub name: String,
    pub submarket: String,
    pub latitude: f64,
    pub longitude: f64,
    pub unit_count: u32,
    pub status: String,
    /// Bucket of the construction start year, if the year falls in the table.
    pub start_bucket: Option<DateBucket>,
    /// Bucket of the (actual or expected) completion year.
    pub completion_bucket: Option<DateBucket>,
}

impl PropertyRecord {
    /// The bucket relevant under the given date mode.
    pub fn bucket_for(&self, mode: DateMode) -> Option<DateBucket> {
        match mode {
            DateMode::Start => self.start_bucket,
            DateMode::Completion => self.completion_bucket,
        }
    }
}

// ---------------------------------------------------------------------------
// Ratio records – per-submarket demand/supply rows and their aggregate
// ---------------------------------------------------------------------------

/// One demand/supply observation for a submarket over one bucket.
#[derive(Debug, Clone)]
pub struct RatioRecord {
    pub submarket: String,
    pub bucket: DateBucket,
    pub demand: f64,
    pub supply: f64,
}

/// Aggregated demand/supply for a submarket over the selected buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmarketRatio {
    pub submarket: String,
    pub demand: f64,
    pub supply: f64,
    /// `demand / supply`, or exactly 1 when supply is zero.
    pub ratio: f64,
}

impl SubmarketRatio {
    /// Build from summed totals, applying the zero-supply fallback.
    pub fn from_totals(submarket: String, demand: f64, supply: f64) -> Self {
        let ratio = if supply > 0.0 { demand / supply } else { 1.0 };
        SubmarketRatio {
            submarket,
            demand,
            supply,
            ratio,
        }
    }
}

// ---------------------------------------------------------------------------
// SubmarketPolygon – a named boundary from the GeoJSON file
// ---------------------------------------------------------------------------

/// A submarket boundary. Names are trimmed of trailing whitespace at load so
/// they match the property table's submarket names.
#[derive(Debug, Clone)]
pub struct SubmarketPolygon {
    pub submarket: String,
    pub market: String,
    pub boundary: MultiPolygon<f64>,
}

// ---------------------------------------------------------------------------
// Dataset containers with precomputed indices
// ---------------------------------------------------------------------------

/// The loaded property table plus its sorted unique submarket names.
#[derive(Debug, Clone, Default)]
pub struct PropertyDataset {
    pub records: Vec<PropertyRecord>,
    /// Sorted unique submarket names, for the selector.
    pub submarkets: Vec<String>,
}

impl PropertyDataset {
    /// Build the submarket index from the loaded records.
    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        let submarkets: BTreeSet<String> =
            records.iter().map(|r| r.submarket.clone()).collect();
        PropertyDataset {
            records,
            submarkets: submarkets.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct buckets present historically for the given date mode.
    pub fn buckets_present(&self, mode: DateMode) -> BTreeSet<DateBucket> {
        self.records
            .iter()
            .filter_map(|r| r.bucket_for(mode))
            .collect()
    }
}

/// The loaded demand/supply table plus its sorted unique submarket names.
#[derive(Debug, Clone, Default)]
pub struct RatioDataset {
    pub rows: Vec<RatioRecord>,
    pub submarkets: Vec<String>,
}

impl RatioDataset {
    pub fn from_rows(rows: Vec<RatioRecord>) -> Self {
        let submarkets: BTreeSet<String> = rows.iter().map(|r| r.submarket.clone()).collect();
        RatioDataset {
            rows,
            submarkets: submarkets.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The distinct buckets present in the ratio rows.
    pub fn buckets_present(&self) -> BTreeSet<DateBucket> {
        self.rows.iter().map(|r| r.bucket).collect()
    }
}

/// Loaded boundary polygons with a trimmed-name lookup index.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    pub polygons: Vec<SubmarketPolygon>,
    index: BTreeMap<String, usize>,
}

impl BoundarySet {
    pub fn from_polygons(polygons: Vec<SubmarketPolygon>) -> Self {
        let index = polygons
            .iter()
            .enumerate()
            .map(|(i, p)| (p.submarket.trim_end().to_string(), i))
            .collect();
        BoundarySet { polygons, index }
    }

    /// Look up a boundary by submarket name, ignoring trailing whitespace.
    pub fn get(&self, submarket: &str) -> Option<&SubmarketPolygon> {
        self.index
            .get(submarket.trim_end())
            .map(|&i| &self.polygons[i])
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_years_to_expected_buckets() {
        assert_eq!(DateBucket::for_year(2018), Some(DateBucket::new(2018, 2020)));
        assert_eq!(DateBucket::for_year(2020), Some(DateBucket::new(2018, 2020)));
        assert_eq!(DateBucket::for_year(2021), Some(DateBucket::new(2021, 2022)));
        assert_eq!(DateBucket::for_year(2028), Some(DateBucket::new(2027, 2028)));
    }

    #[test]
    fn years_outside_the_table_have_no_bucket() {
        assert_eq!(DateBucket::for_year(2017), None);
        assert_eq!(DateBucket::for_year(2029), None);
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for bucket in DateBucket::ALL {
            let parsed: DateBucket = bucket.label().parse().unwrap();
            assert_eq!(parsed, bucket);
        }
    }

    #[test]
    fn parse_accepts_surrounding_whitespace() {
        let parsed: DateBucket = " 2021-2022 ".parse().unwrap();
        assert_eq!(parsed, DateBucket::new(2021, 2022));
    }

    #[test]
    fn parse_rejects_unknown_ranges() {
        assert!("2016-2017".parse::<DateBucket>().is_err());
        assert!("2018".parse::<DateBucket>().is_err());
        assert!("not-a-range".parse::<DateBucket>().is_err());
    }

    #[test]
    fn buckets_order_by_table_position() {
        let mut shuffled = vec![
            DateBucket::new(2027, 2028),
            DateBucket::new(2018, 2020),
            DateBucket::new(2023, 2024),
        ];
        shuffled.sort();
        assert_eq!(shuffled[0], DateBucket::new(2018, 2020));
        assert_eq!(shuffled[2], DateBucket::new(2027, 2028));
    }

    #[test]
    fn zero_supply_ratio_falls_back_to_one() {
        let r = SubmarketRatio::from_totals("Five Points".into(), 42.0, 0.0);
        assert_eq!(r.ratio, 1.0);

        let r = SubmarketRatio::from_totals("Five Points".into(), 0.0, 0.0);
        assert_eq!(r.ratio, 1.0);
    }

    #[test]
    fn positive_supply_divides_normally() {
        let r = SubmarketRatio::from_totals("Capitol Hill".into(), 30.0, 10.0);
        assert_eq!(r.ratio, 3.0);
    }

    #[test]
    fn dataset_indexes_sorted_unique_submarkets() {
        let records = vec![
            property("B", "Highland"),
            property("A", "Aurora"),
            property("C", "Highland"),
        ];
        let ds = PropertyDataset::from_records(records);
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.submarkets,
            vec!["Aurora".to_string(), "Highland".to_string()]
        );
    }

    #[test]
    fn boundary_lookup_ignores_trailing_whitespace() {
        let set = BoundarySet::from_polygons(vec![SubmarketPolygon {
            submarket: "Cherry Creek  ".into(),
            market: "Denver".into(),
            boundary: MultiPolygon(vec![]),
        }]);
        assert!(set.get("Cherry Creek").is_some());
        assert!(set.get("Cherry Creek ").is_some());
        assert!(set.get("Glendale").is_none());
    }

    fn property(name: &str, submarket: &str) -> PropertyRecord {
        PropertyRecord {
            name: name.into(),
            submarket: submarket.into(),
            latitude: 39.7,
            longitude: -105.0,
            unit_count: 100,
            status: "Under Construction".into(),
            start_bucket: DateBucket::for_year(2021),
            completion_bucket: DateBucket::for_year(2023),
        }
    }
}
