use crate::render::theme::Rgb;
use crate::utils::error::{PosterError, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};

/// Common system locations tried when no font path is configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

/// A loaded TTF used for all poster text.
#[derive(Debug)]
pub struct Typeface {
    font: Font<'static>,
}

impl Typeface {
    /// Load from an explicit path, or probe the usual system locations.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            let data = std::fs::read(path).map_err(|e| PosterError::FontError {
                message: format!("cannot read font '{}': {}", path, e),
            })?;
            return Self::from_bytes(data, path);
        }

        for candidate in FONT_CANDIDATES {
            if let Ok(data) = std::fs::read(candidate) {
                return Self::from_bytes(data, candidate);
            }
        }

        Err(PosterError::FontError {
            message: "no TTF found in the default font locations".to_string(),
        })
    }

    fn from_bytes(data: Vec<u8>, origin: &str) -> Result<Self> {
        let font = Font::try_from_vec(data).ok_or_else(|| PosterError::FontError {
            message: format!("'{}' is not a usable TTF", origin),
        })?;
        Ok(Self { font })
    }

    fn text_width(&self, text: &str, scale: Scale) -> f32 {
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Draw `text` horizontally centered with its top edge at `y_top`.
    pub fn draw_centered(
        &self,
        image: &mut RgbaImage,
        text: &str,
        size_px: f32,
        color: Rgb,
        y_top: i32,
    ) {
        let scale = Scale::uniform(size_px);
        let width = self.text_width(text, scale);
        let x = ((image.width() as f32 - width) / 2.0).round() as i32;
        draw_text_mut(
            image,
            Rgba([color.r, color.g, color.b, 255]),
            x.max(0),
            y_top,
            scale,
            &self.font,
            text,
        );
    }
}

/// City name styling: uppercase letters separated by two spaces.
pub fn spaced_city(city: &str) -> String {
    intersperse(&city.to_uppercase(), "  ")
}

/// Country styling: uppercase letters separated by four spaces.
pub fn spaced_country(country: &str) -> String {
    intersperse(&country.to_uppercase(), "    ")
}

fn intersperse(text: &str, sep: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    if let Some(first) = chars.next() {
        out.push(first);
    }
    for c in chars {
        out.push_str(sep);
        out.push(c);
    }
    out
}

/// The coordinate caption, e.g. `45.5285° N / 13.5684° E`.
pub fn format_coordinates(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}° {} / {:.4}° {}", lat.abs(), ns, lon.abs(), ew)
}
