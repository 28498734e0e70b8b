use serde::{Deserialize, Serialize};

/// WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Road classification derived from the OSM `highway` tag.
///
/// Motorway/trunk ways (including their `_link` ramps) take the accent
/// color and the widest stroke, primary/secondary the mid tier, and
/// everything else renders as background streets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadClass {
    Highway,
    Primary,
    Minor,
}

impl RoadClass {
    /// Classify a raw `highway` tag value. Values joined with `;` classify
    /// by their first entry.
    pub fn from_highway_tag(tag: &str) -> Self {
        let first = tag.split(';').next().unwrap_or(tag).trim();
        if first.contains("motorway") || first.contains("trunk") {
            RoadClass::Highway
        } else if first.contains("primary") || first.contains("secondary") {
            RoadClass::Primary
        } else {
            RoadClass::Minor
        }
    }

    /// Relative stroke weight, scaled to pixels by the renderer.
    pub fn stroke_weight(&self) -> f32 {
        match self {
            RoadClass::Highway => 2.5,
            RoadClass::Primary => 1.5,
            RoadClass::Minor => 0.8,
        }
    }
}

/// One drawable road way, already classified.
#[derive(Debug, Clone)]
pub struct RoadSegment {
    pub class: RoadClass,
    pub points: Vec<GeoPoint>,
}

/// Water feature returned by the map data provider.
///
/// Closed ways fill as polygons; open ways (rivers, canals) stroke as
/// channels.
#[derive(Debug, Clone)]
pub enum WaterBody {
    Area(Vec<GeoPoint>),
    Channel(Vec<GeoPoint>),
}

/// Vector map data for one poster: the road network plus whatever water
/// features the provider returned (possibly none).
#[derive(Debug, Clone, Default)]
pub struct MapData {
    pub roads: Vec<RoadSegment>,
    pub water: Vec<WaterBody>,
}

/// A single poster render job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterRequest {
    pub city: String,
    pub country: String,
    pub distance_m: u32,
    pub theme: String,
}

impl PosterRequest {
    /// The place string handed to the geocoder.
    pub fn place(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    /// Output filename for this job, `{city}_{theme}.png` with spaces
    /// collapsed to underscores.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.png",
            self.city.to_lowercase().replace(' ', "_"),
            self.theme
        )
    }
}
