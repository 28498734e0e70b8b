pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{MapData, PosterRequest};
pub use crate::domain::ports::{PosterConfig, PosterPipeline, Storage};
pub use crate::utils::error::Result;
pub use engine::PosterEngine;
pub use pipeline::SimplePosterPipeline;
