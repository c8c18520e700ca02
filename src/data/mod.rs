/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  built-in fixture   .json / .csv
///         │               │
///         │          ┌──────────┐
///         │          │  loader   │  parse file → Vec<SensorReading>
///         │          └──────────┘
///         ▼               ▼
///   ┌────────────────────────┐
///   │     SensorDataset      │  Vec<SensorReading>, option lists
///   └────────────────────────┘
///         │
///         ▼
///   ┌──────────┐
///   │  filter   │  FilterState predicates → visible indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
