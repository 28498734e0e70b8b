pub mod config;
pub mod core;
pub mod domain;
pub mod net;
pub mod render;
pub mod utils;

#[cfg(feature = "server")]
pub mod web;

#[cfg(any(feature = "cli", feature = "server"))]
pub use config::CliConfig;
pub use config::LocalStorage;

pub use core::{PosterEngine, SimplePosterPipeline};
pub use domain::model::PosterRequest;
pub use render::{ThemeSet, Typeface};
pub use utils::error::{PosterError, Result};
