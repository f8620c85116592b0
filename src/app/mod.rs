// DevPanel - app/mod.rs
//
// Session layer: the developer-dashboard view-model and its registry seam.

pub mod registry;
pub mod session;
