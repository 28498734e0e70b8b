pub mod canvas;
pub mod poster;
pub mod projection;
pub mod theme;
pub mod typography;

pub use poster::PosterRenderer;
pub use theme::{fallback_coordinates, Theme, ThemeColors, ThemeSet};
pub use typography::Typeface;
