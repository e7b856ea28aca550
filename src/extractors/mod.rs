// src/extractors/mod.rs
pub mod markers;

// Re-export key extraction types for convenience
pub use markers::{extract, normalize, ExtractionSpec, NisabValue};
