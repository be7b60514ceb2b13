//! Rendering: the cell buffer and the differential terminal writer.

pub mod buffer;
pub mod diff;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
