//! The deck: slide descriptors, mounted scenes, the canonical slide list and
//! the headless player that ties them to navigation.

pub mod content;
pub mod player;
pub mod scene;
pub mod slide;

pub use content::slides;
pub use player::{DeckPlayer, HitTarget};
pub use scene::Scene;
pub use slide::{Block, SceneBuilder, SlideDescriptor, SlideScript, Span, Spans};
