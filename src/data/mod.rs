/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///   .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → GradeTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ GradeTable │  Vec<Record>, exam types in first-appearance order
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  group by exam type → Vec<GroupStatistic>
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod stats;
