/// Data layer: core types, loading, selection, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Reading>, year bounds, gauge list
///   └──────────┘
///        │          ┌───────────┐
///        ▼          │ Selection  │  year range, gauge set, toggle phase
///   ┌──────────┐   └───────────┘
///   │  filter   │◄────────┘
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  sums, shares, series, bucketed totals
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod selection;
