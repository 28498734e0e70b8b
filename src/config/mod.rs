pub mod storage;
pub mod theme_file;

pub use storage::LocalStorage;
pub use theme_file::ThemeFileConfig;

#[cfg(any(feature = "cli", feature = "server"))]
use crate::domain::ports::PosterConfig;
#[cfg(any(feature = "cli", feature = "server"))]
use crate::utils::error::Result;
#[cfg(any(feature = "cli", feature = "server"))]
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_url, Validate,
};
#[cfg(any(feature = "cli", feature = "server"))]
use clap::Parser;
#[cfg(any(feature = "cli", feature = "server"))]
use serde::{Deserialize, Serialize};

pub const MIN_DISTANCE_M: u32 = 500;
pub const MAX_DISTANCE_M: u32 = 10_000;
pub const DEFAULT_DISTANCE_M: u32 = 2_500;

#[cfg(any(feature = "cli", feature = "server"))]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "city-poster")]
#[command(about = "Generate decorative city map posters from OpenStreetMap data")]
pub struct CliConfig {
    #[arg(long, default_value = "Piran")]
    pub city: String,

    #[arg(long, default_value = "Slovenia")]
    pub country: String,

    #[arg(long, default_value_t = DEFAULT_DISTANCE_M, help = "Map radius in meters from the center")]
    pub distance: u32,

    #[arg(long, default_value = "all", help = "Theme name, or 'all' for every theme")]
    pub theme: String,

    #[arg(long, default_value = "./posters")]
    pub output_path: String,

    #[arg(long, default_value_t = 1200, help = "Poster width in pixels (height is 4/3 of it)")]
    pub width: u32,

    #[arg(long, help = "Path to a TTF font; system fonts are probed otherwise")]
    pub font: Option<String>,

    #[arg(long, help = "TOML file with extra or overriding themes")]
    pub themes_file: Option<String>,

    #[arg(long, default_value = "https://nominatim.openstreetmap.org/search")]
    pub geocoder_url: String,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "https://overpass.kumi.systems/api/interpreter,https://overpass-api.de/api/interpreter"
    )]
    pub overpass_urls: Vec<String>,

    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, help = "Additionally bundle the PNGs into posters.zip")]
    pub archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system resource usage per stage")]
    pub monitor: bool,
}

#[cfg(any(feature = "cli", feature = "server"))]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("city", &self.city)?;
        validate_non_empty_string("country", &self.country)?;
        validate_non_empty_string("theme", &self.theme)?;
        validate_range("distance", self.distance, MIN_DISTANCE_M, MAX_DISTANCE_M)?;
        validate_range("width", self.width, 300, 4_000)?;
        validate_url("geocoder_url", &self.geocoder_url)?;
        for url in &self.overpass_urls {
            validate_url("overpass_urls", url)?;
        }
        Ok(())
    }
}

#[cfg(any(feature = "cli", feature = "server"))]
impl PosterConfig for CliConfig {
    fn geocoder_endpoint(&self) -> &str {
        &self.geocoder_url
    }

    fn overpass_endpoints(&self) -> &[String] {
        &self.overpass_urls
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn canvas_width(&self) -> u32 {
        self.width
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn font_path(&self) -> Option<&str> {
        self.font.as_deref()
    }
}
