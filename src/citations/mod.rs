//! Citations: the static registry and the hover overlay.

pub mod overlay;
pub mod registry;

pub use overlay::{CitationAnchor, CitationOverlay, Placement, Tooltip};
pub use registry::{label, lookup, CitationEntry};
