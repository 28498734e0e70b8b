use crate::domain::model::{GeoPoint, RoadClass};
use crate::utils::error::{PosterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(role: &str, value: &str) -> Result<Self> {
        let invalid = || PosterError::InvalidColor {
            role: role.to_string(),
            value: value.to_string(),
        };

        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 {
            return Err(invalid());
        }

        let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
        let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
        let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
        Ok(Rgb { r, g, b })
    }
}

/// Raw theme colors as they appear in a themes file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: String,
    pub water: String,
    pub highway: String,
    pub primary: String,
    pub other: String,
    pub text: String,
}

/// A parsed theme: semantic roles resolved to colors.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Rgb,
    pub water: Rgb,
    pub highway: Rgb,
    pub primary: Rgb,
    pub other: Rgb,
    pub text: Rgb,
}

impl Theme {
    pub fn from_colors(name: &str, colors: &ThemeColors) -> Result<Self> {
        Ok(Theme {
            name: name.to_string(),
            background: Rgb::from_hex("background", &colors.background)?,
            water: Rgb::from_hex("water", &colors.water)?,
            highway: Rgb::from_hex("highway", &colors.highway)?,
            primary: Rgb::from_hex("primary", &colors.primary)?,
            other: Rgb::from_hex("other", &colors.other)?,
            text: Rgb::from_hex("text", &colors.text)?,
        })
    }

    /// Stroke color for a road class.
    pub fn road_color(&self, class: RoadClass) -> Rgb {
        match class {
            RoadClass::Highway => self.highway,
            RoadClass::Primary => self.primary,
            RoadClass::Minor => self.other,
        }
    }
}

/// The named themes available to a pipeline. Starts from the six built-ins;
/// a themes file can add to or override them.
#[derive(Debug, Clone)]
pub struct ThemeSet {
    themes: BTreeMap<String, Theme>,
}

impl ThemeSet {
    pub fn builtin() -> Self {
        let mut themes = BTreeMap::new();
        for (name, colors) in builtin_themes() {
            // Built-in hex values are static and known-good.
            let theme = Theme::from_colors(name, &colors)
                .unwrap_or_else(|e| panic!("builtin theme '{}' is invalid: {}", name, e));
            themes.insert(name.to_string(), theme);
        }
        Self { themes }
    }

    pub fn insert(&mut self, theme: Theme) {
        self.themes.insert(theme.name.clone(), theme);
    }

    pub fn get(&self, name: &str) -> Result<&Theme> {
        self.themes.get(name).ok_or_else(|| PosterError::UnknownTheme {
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

fn colors(
    background: &str,
    water: &str,
    highway: &str,
    primary: &str,
    other: &str,
    text: &str,
) -> ThemeColors {
    ThemeColors {
        background: background.to_string(),
        water: water.to_string(),
        highway: highway.to_string(),
        primary: primary.to_string(),
        other: other.to_string(),
        text: text.to_string(),
    }
}

/// The six canonical palettes.
fn builtin_themes() -> Vec<(&'static str, ThemeColors)> {
    vec![
        (
            "sea_view",
            colors("#f0f4f7", "#0077be", "#004466", "#444444", "#999999", "#004466"),
        ),
        (
            "gold",
            colors("#0b0d0f", "#1a1c1e", "#ffcc33", "#ffffff", "#555555", "#ffcc33"),
        ),
        (
            "cyberpunk",
            colors("#050a1a", "#112244", "#ff00ff", "#00ffff", "#4d4d4d", "#ffcc00"),
        ),
        (
            "forest",
            colors("#020a02", "#0a2212", "#2ecc71", "#ffffff", "#445544", "#2ecc71"),
        ),
        (
            "blueprint",
            colors("#102a43", "#0c1b2d", "#48bb78", "#38a169", "#ffffff", "#ffffff"),
        ),
        (
            "ink",
            colors("#ffffff", "#e0e0e0", "#000000", "#333333", "#999999", "#000000"),
        ),
    ]
}

/// Hard-coded coordinates used when geocoding fails for a known city.
/// Lookup is case-insensitive on the city name alone.
pub fn fallback_coordinates(city: &str) -> Option<GeoPoint> {
    let coords = match city.trim().to_lowercase().as_str() {
        "piran" => (45.5285, 13.5684),
        "ljubljana" => (46.0569, 14.5058),
        "novo mesto" => (45.8010, 15.1710),
        "maribor" => (46.5547, 15.6459),
        "london" => (51.5074, -0.1278),
        "paris" => (48.8566, 2.3522),
        "berlin" => (52.5200, 13.4050),
        "new york" => (40.7128, -74.0060),
        "tokyo" => (35.6762, 139.6503),
        _ => return None,
    };
    Some(GeoPoint::new(coords.0, coords.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set_has_six_themes() {
        let themes = ThemeSet::builtin();
        assert_eq!(themes.len(), 6);
        for name in ["sea_view", "gold", "cyberpunk", "forest", "blueprint", "ink"] {
            assert!(themes.get(name).is_ok(), "missing builtin theme {}", name);
        }
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let themes = ThemeSet::builtin();
        let err = themes.get("vaporwave").unwrap_err();
        assert!(matches!(
            err,
            crate::utils::error::PosterError::UnknownTheme { .. }
        ));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            Rgb::from_hex("background", "#ffcc33").unwrap(),
            Rgb { r: 0xff, g: 0xcc, b: 0x33 }
        );
        assert!(Rgb::from_hex("background", "ffcc33").is_err());
        assert!(Rgb::from_hex("background", "#ffcc3").is_err());
        assert!(Rgb::from_hex("background", "#gggggg").is_err());
    }

    #[test]
    fn test_road_colors_follow_roles() {
        let themes = ThemeSet::builtin();
        let gold = themes.get("gold").unwrap();
        assert_eq!(gold.road_color(RoadClass::Highway), gold.highway);
        assert_eq!(gold.road_color(RoadClass::Primary), gold.primary);
        assert_eq!(gold.road_color(RoadClass::Minor), gold.other);
        assert_eq!(gold.highway, Rgb { r: 0xff, g: 0xcc, b: 0x33 });
    }

    #[test]
    fn test_fallback_lookup_is_case_insensitive() {
        let point = fallback_coordinates("PIRAN").unwrap();
        assert!((point.lat - 45.5285).abs() < 1e-9);
        assert!((point.lon - 13.5684).abs() < 1e-9);
        assert!(fallback_coordinates("  piran ").is_some());
        assert!(fallback_coordinates("atlantis").is_none());
    }

    #[test]
    fn test_insert_overrides_builtin() {
        let mut themes = ThemeSet::builtin();
        let custom = Theme::from_colors(
            "ink",
            &colors("#000000", "#111111", "#ffffff", "#eeeeee", "#dddddd", "#ffffff"),
        )
        .unwrap();
        themes.insert(custom);
        assert_eq!(themes.len(), 6);
        assert_eq!(
            themes.get("ink").unwrap().background,
            Rgb { r: 0, g: 0, b: 0 }
        );
    }
}
