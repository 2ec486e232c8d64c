//! Laptop catalog analytics: CSV loading and normalization, filtering,
//! brand share and year-over-year trends.
//!
//! The [`data`] module is front-end agnostic; the desktop viewer and the
//! `report` binary are thin layers over it.

pub mod config;
pub mod data;
