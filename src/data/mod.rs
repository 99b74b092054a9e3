/// Data layer: core types, loading, sector aggregation and summaries.
///
/// Architecture:
/// ```text
///  decoded .mat variables
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  normalize → Scenario of RawSeries
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐     ┌───────────┐
///   │ aggregate  │◄────│  sectors   │  SectorMap, built once
///   └───────────┘     └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  experiment mean + percentile band
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ compare   │  scenario vs. baseline
///   └──────────┘
/// ```

pub mod aggregate;
pub mod compare;
pub mod loader;
pub mod model;
pub mod sectors;
pub mod summary;
