use crate::render::theme::{Theme, ThemeColors, ThemeSet};
use crate::utils::error::{PosterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A themes file declares palettes under `[themes.<name>]`, each with the
/// six color roles as `#rrggbb` strings. Loaded themes are merged over the
/// built-ins, overriding on name collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeFileConfig {
    pub themes: HashMap<String, ThemeColors>,
}

impl ThemeFileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PosterError::ConfigError {
            message: format!("cannot read themes file '{}': {}", path.display(), e),
        })?;

        let config: ThemeFileConfig =
            toml::from_str(&content).map_err(|e| PosterError::ConfigError {
                message: format!("invalid themes file '{}': {}", path.display(), e),
            })?;

        if config.themes.is_empty() {
            return Err(PosterError::ConfigError {
                message: format!("themes file '{}' declares no themes", path.display()),
            });
        }

        Ok(config)
    }

    /// Parse every declared theme and merge it into `set`.
    pub fn merge_into(&self, set: &mut ThemeSet) -> Result<()> {
        for (name, colors) in &self.themes {
            let theme = Theme::from_colors(name, colors)?;
            set.insert(theme);
        }
        Ok(())
    }
}

/// The theme set for a run: built-ins plus an optional themes file.
pub fn load_theme_set(themes_file: Option<&str>) -> Result<ThemeSet> {
    let mut set = ThemeSet::builtin();
    if let Some(path) = themes_file {
        let config = ThemeFileConfig::from_file(path)?;
        config.merge_into(&mut set)?;
        tracing::info!("loaded {} theme(s) from {}", config.themes.len(), path);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_themes_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_adds_new_theme() {
        let file = write_themes_file(
            r##"
            [themes.midnight]
            background = "#101018"
            water = "#181830"
            highway = "#ff6600"
            primary = "#cccccc"
            other = "#444455"
            text = "#ff6600"
            "##,
        );

        let set = load_theme_set(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(set.len(), 7);
        let midnight = set.get("midnight").unwrap();
        assert_eq!(midnight.highway.r, 0xff);
        assert_eq!(midnight.highway.g, 0x66);
    }

    #[test]
    fn test_file_theme_overrides_builtin() {
        let file = write_themes_file(
            r##"
            [themes.ink]
            background = "#123456"
            water = "#e0e0e0"
            highway = "#000000"
            primary = "#333333"
            other = "#999999"
            text = "#000000"
            "##,
        );

        let set = load_theme_set(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(set.len(), 6);
        assert_eq!(set.get("ink").unwrap().background.r, 0x12);
    }

    #[test]
    fn test_invalid_color_in_file_is_an_error() {
        let file = write_themes_file(
            r##"
            [themes.broken]
            background = "nope"
            water = "#e0e0e0"
            highway = "#000000"
            primary = "#333333"
            other = "#999999"
            text = "#000000"
            "##,
        );

        let config = ThemeFileConfig::from_file(file.path()).unwrap();
        let mut set = ThemeSet::builtin();
        assert!(config.merge_into(&mut set).is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let file = write_themes_file("themes = 3");
        let err = ThemeFileConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, PosterError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = ThemeFileConfig::from_file("/nonexistent/themes.toml").unwrap_err();
        assert!(matches!(err, PosterError::ConfigError { .. }));
    }

    #[test]
    fn test_no_file_yields_builtins() {
        let set = load_theme_set(None).unwrap();
        assert_eq!(set.len(), 6);
    }
}
