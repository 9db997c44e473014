pub mod display_mapping;
pub mod grid_overlay;
pub mod spectrum_display;

pub use display_mapping::{DisplayMapping, Point};
pub use grid_overlay::GridLine;
