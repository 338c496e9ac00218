/// Data layer: core types, loading, filtering, and derived metrics.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .geojson
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → PropertyDataset / RatioDataset / BoundarySet
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply bucket + submarket selection → indices / aggregates
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  metrics  │  unit ratio, summaries, per-bucket totals
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod filter;
pub mod metrics;
