use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Geocoding failed for '{place}': {reason}")]
    GeocodingError { place: String, reason: String },

    #[error("Map data unavailable: {message}")]
    MapDataError { message: String },

    #[error("Unknown theme: '{name}'")]
    UnknownTheme { name: String },

    #[error("Invalid color '{value}' for role '{role}'")]
    InvalidColor { role: String, value: String },

    #[error("Font unavailable: {message}")]
    FontError { message: String },

    #[error("Rendering error: {message}")]
    RenderError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Rendering,
    System,
}

impl PosterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PosterError::RequestError(_)
            | PosterError::GeocodingError { .. }
            | PosterError::MapDataError { .. } => ErrorCategory::Network,
            PosterError::ConfigError { .. }
            | PosterError::MissingConfigError { .. }
            | PosterError::InvalidConfigValueError { .. }
            | PosterError::UnknownTheme { .. }
            | PosterError::InvalidColor { .. } => ErrorCategory::Configuration,
            PosterError::ImageError(_)
            | PosterError::RenderError { .. }
            | PosterError::FontError { .. } => ErrorCategory::Rendering,
            PosterError::IoError(_)
            | PosterError::SerializationError(_)
            | PosterError::ZipError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PosterError::GeocodingError { .. } => ErrorSeverity::Medium,
            PosterError::RequestError(_) | PosterError::MapDataError { .. } => {
                ErrorSeverity::Medium
            }
            PosterError::UnknownTheme { .. }
            | PosterError::InvalidColor { .. }
            | PosterError::ConfigError { .. }
            | PosterError::MissingConfigError { .. }
            | PosterError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            PosterError::ImageError(_)
            | PosterError::RenderError { .. }
            | PosterError::FontError { .. } => ErrorSeverity::High,
            PosterError::IoError(_)
            | PosterError::SerializationError(_)
            | PosterError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PosterError::GeocodingError { place, .. } => format!(
                "Check the spelling of '{}' or pass coordinates for a known city",
                place
            ),
            PosterError::RequestError(_) | PosterError::MapDataError { .. } => {
                "Check network connectivity and retry; Overpass mirrors rate-limit heavy use"
                    .to_string()
            }
            PosterError::UnknownTheme { name } => {
                format!("Pick a built-in theme or declare '{}' in a themes file", name)
            }
            PosterError::InvalidColor { .. } => {
                "Colors must be '#rrggbb' hex strings".to_string()
            }
            PosterError::FontError { .. } => {
                "Install DejaVu or Liberation fonts, or pass --font <path-to-ttf>".to_string()
            }
            PosterError::ConfigError { .. }
            | PosterError::MissingConfigError { .. }
            | PosterError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the themes file".to_string()
            }
            PosterError::ImageError(_) | PosterError::RenderError { .. } => {
                "Try a smaller canvas width or a shorter distance".to_string()
            }
            PosterError::IoError(_) => "Check the output path exists and is writable".to_string(),
            PosterError::SerializationError(_) => {
                "The upstream response was malformed; retry later".to_string()
            }
            PosterError::ZipError(_) => "Retry without --archive".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PosterError::GeocodingError { place, .. } => {
                format!("Could not find '{}'. Check the spelling.", place)
            }
            PosterError::MapDataError { .. } => {
                "The map data service did not respond. Try again shortly.".to_string()
            }
            PosterError::RequestError(_) => "A network request failed.".to_string(),
            PosterError::UnknownTheme { name } => format!("'{}' is not a known theme.", name),
            PosterError::FontError { .. } => "No usable font was found.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PosterError>;
