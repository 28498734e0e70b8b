pub mod model;
pub mod ports;

pub use model::{
    BoundingBox, GeoPoint, MapData, PosterRequest, RoadClass, RoadSegment, WaterBody,
};
pub use ports::{PosterConfig, PosterPipeline, Storage};
