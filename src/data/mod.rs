/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate header, parse rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date interval, continent / country → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  KPIs, medians by continent, yearly counts, histograms
///   │ geo       │  projection, map centre, grid clusters
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  grouped tables → CSV
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod model;
