/// Data layer: core types, loading, profiling and column selection.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .xls
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  typed columns, row count
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ profile   │   │  select   │  head of the chosen columns
///   └──────────┘   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod profile;
pub mod select;
