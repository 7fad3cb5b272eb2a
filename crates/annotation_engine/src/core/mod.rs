//! Core engine types
//!
//! Settings shared by the library and the applications built on it.

pub mod config;

pub use config::{AnnotationConfig, AnnotationEntry, AnnotationSettings, EngineConfig};
