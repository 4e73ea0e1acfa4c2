/// Data layer: core types, loading, filtering, and chart assembly.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MeasurementTable (sorted by Date)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive date interval → TableView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ category  │  column rules per category → y-columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  TableView + y-columns → ChartSpec
///   └──────────┘
/// ```
///
/// `writer` goes the other way, turning a view back into CSV.

pub mod category;
pub mod chart;
pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
