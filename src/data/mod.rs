//! Data layer: typed records and file loading.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset  │  Vec<Record>, column order
//!   └──────────┘
//!        │
//!        ▼
//!   chart::build  (selected columns → series + summary)
//! ```

pub mod loader;
pub mod model;
