use crate::domain::model::{BoundingBox, GeoPoint};

const EARTH_METERS_PER_DEG_LAT: f64 = 111_320.0;

pub fn meters_per_degree_lat() -> f64 {
    EARTH_METERS_PER_DEG_LAT
}

pub fn meters_per_degree_lon(lat: f64) -> f64 {
    EARTH_METERS_PER_DEG_LAT * lat.to_radians().cos()
}

impl BoundingBox {
    /// Symmetric box of ±`dist_m` meters around a center point.
    pub fn around(center: GeoPoint, dist_m: u32) -> Self {
        let dlat = dist_m as f64 / meters_per_degree_lat();
        let dlon = dist_m as f64 / meters_per_degree_lon(center.lat);
        BoundingBox {
            south: center.lat - dlat,
            west: center.lon - dlon,
            north: center.lat + dlat,
            east: center.lon + dlon,
        }
    }
}

/// Maps WGS84 coordinates into a square pixel viewport using a local
/// equirectangular projection centered on the poster point. North is up,
/// so the pixel y axis is flipped relative to latitude.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    center: GeoPoint,
    lat_scale: f64,
    lon_scale: f64,
    half_extent_m: f64,
    viewport_px: f64,
}

impl Projector {
    pub fn new(center: GeoPoint, dist_m: u32, viewport_px: u32) -> Self {
        Self {
            center,
            lat_scale: meters_per_degree_lat(),
            lon_scale: meters_per_degree_lon(center.lat),
            half_extent_m: dist_m as f64,
            viewport_px: viewport_px as f64,
        }
    }

    /// Project a point to (x, y) pixels within the viewport. Points outside
    /// the bounding box land outside [0, viewport) and are clipped by the
    /// rasterizer.
    pub fn project(&self, point: GeoPoint) -> (f32, f32) {
        let east_m = (point.lon - self.center.lon) * self.lon_scale;
        let north_m = (point.lat - self.center.lat) * self.lat_scale;
        let px_per_m = self.viewport_px / (2.0 * self.half_extent_m);
        let x = self.viewport_px / 2.0 + east_m * px_per_m;
        let y = self.viewport_px / 2.0 - north_m * px_per_m;
        (x as f32, y as f32)
    }
}
