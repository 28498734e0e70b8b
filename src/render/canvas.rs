use crate::domain::model::{GeoPoint, MapData, WaterBody};
use crate::render::projection::Projector;
use crate::render::theme::{Rgb, Theme};
use crate::utils::error::{PosterError, Result};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform,
};

/// Reference width the relative stroke weights were tuned against.
const BASE_VIEWPORT_PX: f32 = 800.0;

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}

fn polyline_path(points: &[GeoPoint], projector: &Projector, close: bool) -> Option<Path> {
    if points.len() < 2 {
        return None;
    }
    let mut pb = PathBuilder::new();
    let (x0, y0) = projector.project(points[0]);
    pb.move_to(x0, y0);
    for point in &points[1..] {
        let (x, y) = projector.project(*point);
        pb.line_to(x, y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

/// Raster layer of the poster: the full portrait pixmap with the map drawn
/// in the top square viewport. Text is overlaid later by the typography
/// pass.
pub struct PosterCanvas {
    pixmap: Pixmap,
    viewport_px: u32,
}

impl PosterCanvas {
    /// Allocate a canvas filled with the theme background. `width` is the
    /// poster width; the canvas is 4:3 portrait and the map viewport is the
    /// top `width`×`width` square.
    pub fn new(width: u32, height: u32, theme: &Theme) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| PosterError::RenderError {
            message: format!("cannot allocate {}x{} canvas", width, height),
        })?;
        pixmap.fill(to_color(theme.background));
        Ok(Self {
            pixmap,
            viewport_px: width,
        })
    }

    fn stroke_scale(&self) -> f32 {
        self.viewport_px as f32 / BASE_VIEWPORT_PX
    }

    /// Water below roads, mirroring the original painter order.
    pub fn draw_map(&mut self, map: &MapData, projector: &Projector, theme: &Theme) {
        self.draw_water(&map.water, projector, theme);
        self.draw_roads(map, projector, theme);
    }

    fn draw_water(&mut self, water: &[WaterBody], projector: &Projector, theme: &Theme) {
        let mut paint = Paint::default();
        paint.set_color(to_color(theme.water));
        paint.anti_alias = true;

        let channel_stroke = Stroke {
            width: 3.0 * self.stroke_scale(),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        for body in water {
            match body {
                WaterBody::Area(points) => {
                    if let Some(path) = polyline_path(points, projector, true) {
                        self.pixmap.fill_path(
                            &path,
                            &paint,
                            FillRule::Winding,
                            Transform::identity(),
                            None,
                        );
                    }
                }
                WaterBody::Channel(points) => {
                    if let Some(path) = polyline_path(points, projector, false) {
                        self.pixmap.stroke_path(
                            &path,
                            &paint,
                            &channel_stroke,
                            Transform::identity(),
                            None,
                        );
                    }
                }
            }
        }
    }

    fn draw_roads(&mut self, map: &MapData, projector: &Projector, theme: &Theme) {
        for road in &map.roads {
            let Some(path) = polyline_path(&road.points, projector, false) else {
                continue;
            };

            let mut paint = Paint::default();
            paint.set_color(to_color(theme.road_color(road.class)));
            paint.anti_alias = true;

            let stroke = Stroke {
                width: road.class.stroke_weight() * self.stroke_scale(),
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };

            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Consume the canvas as straight RGBA bytes. All poster colors are
    /// opaque, so premultiplication is a no-op.
    pub fn into_rgba_bytes(self) -> Vec<u8> {
        self.pixmap.take()
    }
}
