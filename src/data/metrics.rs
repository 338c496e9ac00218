use std::collections::BTreeMap;

use super::model::{DateBucket, DateMode, PropertyRecord, SubmarketRatio};

// ---------------------------------------------------------------------------
// Historical-volume ratio
// ---------------------------------------------------------------------------

/// Scale factor comparing a filtered period's unit volume to the volume a
/// period of that length would carry if history were uniform.
///
/// `bucket_fraction = selected_buckets / historical_buckets`, so
/// `expected_units = historical_units * bucket_fraction` and the result is
/// `filtered_units / expected_units`. Unbounded above; 0 when the filtered
/// scope has no units. Returns `None` whenever the math is undefined: no
/// buckets selected, no historical buckets, or no expected units. Both unit
/// totals must be computed over the same submarket scope.
pub fn unit_ratio(
    filtered_units: f64,
    historical_units: f64,
    selected_buckets: usize,
    historical_buckets: usize,
) -> Option<f64> {
    if selected_buckets == 0 || historical_buckets == 0 {
        return None;
    }
    let bucket_fraction = selected_buckets as f64 / historical_buckets as f64;
    let expected_units = historical_units * bucket_fraction;
    if expected_units <= 0.0 {
        return None;
    }
    Some(filtered_units / expected_units)
}

/// Sum of unit counts over the indexed records.
pub fn total_units(records: &[PropertyRecord], indices: &[usize]) -> u64 {
    indices
        .iter()
        .map(|&i| u64::from(records[i].unit_count))
        .sum()
}

/// Sum of unit counts over every record carrying a bucket for `mode`,
/// optionally restricted to one submarket. This is the historical total the
/// uniform-rate estimate scales down from: records outside every bucket
/// window belong to no period and are not counted.
pub fn historical_units(
    records: &[PropertyRecord],
    mode: DateMode,
    submarket: Option<&str>,
) -> u64 {
    records
        .iter()
        .filter(|r| r.bucket_for(mode).is_some())
        .filter(|r| match submarket {
            Some(wanted) => r.submarket.trim_end() == wanted.trim_end(),
            None => true,
        })
        .map(|r| u64::from(r.unit_count))
        .sum()
}

// ---------------------------------------------------------------------------
// Summary statistics for display
// ---------------------------------------------------------------------------

/// Scalars shown under the map for the property views.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub properties: usize,
    pub units: u64,
    pub avg_units: f64,
    /// Filtered volume as a percentage of the historical average for a
    /// period of this length, when the estimate is defined.
    pub pct_of_expected: Option<f64>,
}

/// Summarize the filtered property scope.
pub fn property_summary(
    records: &[PropertyRecord],
    indices: &[usize],
    unit_ratio: Option<f64>,
) -> SummaryStats {
    let properties = indices.len();
    let units = total_units(records, indices);
    let avg_units = if properties == 0 {
        0.0
    } else {
        units as f64 / properties as f64
    };
    SummaryStats {
        properties,
        units,
        avg_units,
        pct_of_expected: unit_ratio.map(|r| r * 100.0),
    }
}

/// Scalars shown under the map for the ratio view.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Min / mean / max over the aggregated ratios, or `None` when empty.
pub fn ratio_stats(ratios: &[SubmarketRatio]) -> Option<RatioStats> {
    if ratios.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for r in ratios {
        min = min.min(r.ratio);
        max = max.max(r.ratio);
        sum += r.ratio;
    }
    Some(RatioStats {
        min,
        avg: sum / ratios.len() as f64,
        max,
    })
}

/// Unit totals per bucket over the indexed records, for the summary table.
pub fn units_by_bucket(
    records: &[PropertyRecord],
    indices: &[usize],
    mode: DateMode,
) -> BTreeMap<DateBucket, u64> {
    let mut totals = BTreeMap::new();
    for &i in indices {
        if let Some(bucket) = records[i].bucket_for(mode) {
            *totals.entry(bucket).or_insert(0) += u64::from(records[i].unit_count);
        }
    }
    totals
}
