/// Data layer: core types, loading, validation and preprocessing.
///
/// Architecture:
/// ```text
///  .csv / .xlsx            manual form
///        │                      │
///        ▼                      │
///   ┌──────────┐                │
///   │  loader   │  file → RawTable
///   └──────────┘                │
///        │                      │
///        ▼                      ▼
///   ┌──────────┐
///   │ validate  │  strings → OrderRecord (all errors collected)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ features  │  OrderRecord → FeatureVector (fixed model layout)
///   └──────────┘
/// ```

pub mod features;
pub mod loader;
pub mod model;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures;
