/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///      laptops.csv
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  loader   │ ───▶ │  images   │  image reference → direct URL
///   └──────────┘      └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ LaptopTable  │  immutable, shared behind Arc
///   └─────────────┘
///        │                    │
///        ▼                    ▼
///   ┌──────────┐        ┌───────────┐
///   │  filter   │ ─────▶ │ aggregate  │  brand share, trends, summary
///   └──────────┘        └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered snapshot → CSV
///   └──────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod images;
pub mod loader;
pub mod model;
