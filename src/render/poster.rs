use crate::domain::model::{GeoPoint, MapData, PosterRequest};
use crate::render::canvas::PosterCanvas;
use crate::render::projection::Projector;
use crate::render::theme::Theme;
use crate::render::typography::{format_coordinates, spaced_city, spaced_country, Typeface};
use crate::utils::error::{PosterError, Result};
use image::RgbaImage;

// Portrait layout lifted from the 12x16in figure: the map fills the top
// square, the bottom band carries the captions at fixed height fractions.
const CITY_Y_FRACTION: f32 = 0.82;
const COUNTRY_Y_FRACTION: f32 = 0.87;
const COORDS_Y_FRACTION: f32 = 0.91;
const CITY_SIZE_FRACTION: f32 = 0.056;
const COUNTRY_SIZE_FRACTION: f32 = 0.0225;
const COORDS_SIZE_FRACTION: f32 = 0.016;

/// Composes the map canvas and the typography into an encoded PNG.
pub struct PosterRenderer {
    typeface: Typeface,
    width: u32,
}

impl PosterRenderer {
    pub fn new(typeface: Typeface, width: u32) -> Self {
        Self { typeface, width }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Poster height for the configured width (3:4 portrait).
    pub fn height(&self) -> u32 {
        self.width * 4 / 3
    }

    pub fn render(
        &self,
        request: &PosterRequest,
        theme: &Theme,
        center: GeoPoint,
        map: &MapData,
    ) -> Result<Vec<u8>> {
        let width = self.width;
        let height = self.height();

        let projector = Projector::new(center, request.distance_m, width);
        let mut canvas = PosterCanvas::new(width, height, theme)?;
        canvas.draw_map(map, &projector, theme);

        let mut image = RgbaImage::from_raw(width, height, canvas.into_rgba_bytes())
            .ok_or_else(|| PosterError::RenderError {
                message: "canvas buffer size mismatch".to_string(),
            })?;

        let h = height as f32;
        self.typeface.draw_centered(
            &mut image,
            &spaced_city(&request.city),
            h * CITY_SIZE_FRACTION,
            theme.text,
            (h * CITY_Y_FRACTION) as i32,
        );
        self.typeface.draw_centered(
            &mut image,
            &spaced_country(&request.country),
            h * COUNTRY_SIZE_FRACTION,
            theme.text,
            (h * COUNTRY_Y_FRACTION) as i32,
        );
        self.typeface.draw_centered(
            &mut image,
            &format_coordinates(center.lat, center.lon),
            h * COORDS_SIZE_FRACTION,
            theme.text,
            (h * COORDS_Y_FRACTION) as i32,
        );

        encode_png(image)
    }
}

fn encode_png(image: RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut out);
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut cursor, image::ImageOutputFormat::Png)?;
    Ok(out)
}
