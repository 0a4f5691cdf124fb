/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesTable (validated once)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ SalesTable  │  Vec<SalesRow>, immutable
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  vendor filter → UPC match → header + series
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod filter;
