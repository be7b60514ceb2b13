//! Layout: text measurement and the page/nav-bar layout.
//!
//! The nav bar and content column are flexbox layouts computed with
//! [Taffy](https://github.com/DioxusLabs/taffy); slide bodies are a simple
//! top-down flow of wrapped text measured with `unicode-width`.

pub mod nav;
pub mod text_measure;

pub use nav::{page_layout, NavLayout, PageLayout, MAX_CONTENT_WIDTH};
pub use text_measure::{string_width, truncate_text, wrap_text};
