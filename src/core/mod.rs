// DevPanel - core/mod.rs
//
// Pure domain layer: report data model and HTML fragment rendering.

pub mod model;
pub mod render;
