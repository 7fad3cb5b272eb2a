//! Screen-space helpers for annotation UI

pub mod edge_indicator;

pub use edge_indicator::{EdgeIndicator, IndicatorPlacement};
