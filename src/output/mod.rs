//! Output handling (styling, field resolution, rendering)

pub mod fields;
pub mod render;
pub mod terminal;

pub use fields::{display_value, is_truthy, resolve};
pub use render::{search_summary, Renderer, SearchSummary};
pub use terminal::Style;
