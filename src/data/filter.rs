use std::collections::{BTreeMap, BTreeSet};

use super::model::{DateBucket, DateMode, PropertyRecord, RatioRecord, SubmarketRatio};

// ---------------------------------------------------------------------------
// FilterSelection – one immutable snapshot of the active filters
// ---------------------------------------------------------------------------

/// The filters in effect for one recomputation pass.
///
/// `submarket: None` means no restriction (the UI's "All" row); the core
/// never sees a sentinel string, so a submarket literally named "All" would
/// still filter correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    /// Selected year-range buckets. Empty means nothing is selected and
    /// every filter result is empty.
    pub buckets: BTreeSet<DateBucket>,
    /// Restrict to a single submarket, or `None` for all.
    pub submarket: Option<String>,
    /// Which date column the bucket filter reads.
    pub mode: DateMode,
}

impl FilterSelection {
    fn matches_submarket(&self, submarket: &str) -> bool {
        match &self.submarket {
            Some(wanted) => submarket.trim_end() == wanted.trim_end(),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Property filtering
// ---------------------------------------------------------------------------

/// Return indices of property records that pass the selection.
///
/// A record passes when:
/// * its bucket for the selection's date mode is present (records outside
///   every bucket window belong to no selectable period), and
/// * that bucket is in the selected set, and
/// * its submarket matches the filter, if one is given.
///
/// Inputs are untouched; an empty bucket selection or an unknown submarket
/// simply yields no indices.
pub fn filtered_indices(records: &[PropertyRecord], selection: &FilterSelection) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            let Some(bucket) = record.bucket_for(selection.mode) else {
                return false;
            };
            selection.buckets.contains(&bucket) && selection.matches_submarket(&record.submarket)
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Ratio aggregation
// ---------------------------------------------------------------------------

/// Filter ratio rows by the selection, then group by submarket summing
/// demand and supply independently, then recompute each ratio from the sums.
///
/// The order matters: summing across the filtered period and dividing once
/// gives the period's true ratio, where averaging per-row ratios would not.
/// Output is sorted by submarket name.
pub fn aggregate_ratios(rows: &[RatioRecord], selection: &FilterSelection) -> Vec<SubmarketRatio> {
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for row in rows {
        if !selection.buckets.contains(&row.bucket) {
            continue;
        }
        if !selection.matches_submarket(&row.submarket) {
            continue;
        }
        let entry = totals.entry(row.submarket.trim_end()).or_insert((0.0, 0.0));
        entry.0 += row.demand;
        entry.1 += row.supply;
    }

    totals
        .into_iter()
        .map(|(submarket, (demand, supply))| {
            SubmarketRatio::from_totals(submarket.to_string(), demand, supply)
        })
        .collect()
}
