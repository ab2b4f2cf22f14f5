/// Data layer: core types, loading, interpolation and ranking.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → StoreBuilder → CityTimeSeriesStore
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────┐
///   │ CityTimeSeriesStore │  Vec<City>, name index, per-city year map
///   └─────────────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌─────────────┐ ┌──────┐
///   │ interpolate │ │ rank │  pure reads over a store snapshot
///   └─────────────┘ └──────┘
/// ```

pub mod interpolate;
pub mod loader;
pub mod model;
pub mod rank;
