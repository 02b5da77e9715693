/// Data layer: core types, loading, and window selection.
///
/// Architecture:
/// ```text
///  .txt / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawMatrix (time rows, frequency columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  window   │  half → reverse → slice time → transpose → slice freq
///   └──────────┘
///        │
///        ▼
///   DisplayMatrix (frequency rows, time columns)
/// ```

pub mod loader;
pub mod model;
pub mod window;
