//! Graph store for the typecanvas editing surface: the box map with
//! its render order, selection state, field-wise patches, and batch
//! import/export built on `typecanvas-parser`.

pub mod graph;
pub mod store;

pub use graph::SchemaGraph;
pub use store::{BoxPatch, BoxSeed, SchemaStore};
