use crate::domain::model::{GeoPoint, MapData, PosterRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait PosterConfig: Send + Sync {
    fn geocoder_endpoint(&self) -> &str;
    fn overpass_endpoints(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn canvas_width(&self) -> u32;
    fn request_timeout_secs(&self) -> u64;
    fn font_path(&self) -> Option<&str>;
}

/// The four stages of a poster job: resolve the place, fetch the map data,
/// rasterize the poster, persist the artifact. Theme lookup happens before
/// any network call via `check_theme`.
#[async_trait]
pub trait PosterPipeline: Send + Sync {
    fn theme_names(&self) -> Vec<String>;
    fn check_theme(&self, name: &str) -> Result<()>;
    async fn locate(&self, request: &PosterRequest) -> Result<GeoPoint>;
    async fn fetch(&self, center: GeoPoint, distance_m: u32) -> Result<MapData>;
    async fn render(
        &self,
        request: &PosterRequest,
        center: GeoPoint,
        map: &MapData,
    ) -> Result<Vec<u8>>;
    async fn store(&self, file_name: &str, data: Vec<u8>) -> Result<String>;
}
