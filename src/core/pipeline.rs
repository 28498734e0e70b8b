use crate::domain::model::{BoundingBox, GeoPoint, MapData, PosterRequest};
use crate::domain::ports::{PosterConfig, PosterPipeline, Storage};
use crate::net::{NominatimClient, OverpassClient};
use crate::render::theme::{fallback_coordinates, ThemeSet};
use crate::render::{PosterRenderer, Typeface};
use crate::utils::error::{PosterError, Result};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("city-poster/", env!("CARGO_PKG_VERSION"));

pub struct SimplePosterPipeline<S: Storage, C: PosterConfig> {
    storage: S,
    config: C,
    geocoder: NominatimClient,
    overpass: OverpassClient,
    renderer: PosterRenderer,
    themes: ThemeSet,
}

impl<S: Storage, C: PosterConfig> SimplePosterPipeline<S, C> {
    /// Build the pipeline: one HTTP client shared by both upstreams, the
    /// typeface loaded up front so font problems surface before any
    /// network call.
    pub fn new(storage: S, config: C, themes: ThemeSet) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;

        let geocoder = NominatimClient::new(client.clone(), config.geocoder_endpoint());
        let overpass = OverpassClient::new(client, config.overpass_endpoints().to_vec());
        let typeface = Typeface::load(config.font_path())?;
        let renderer = PosterRenderer::new(typeface, config.canvas_width());

        Ok(Self {
            storage,
            config,
            geocoder,
            overpass,
            renderer,
            themes,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: PosterConfig> PosterPipeline for SimplePosterPipeline<S, C> {
    fn theme_names(&self) -> Vec<String> {
        self.themes.names()
    }

    fn check_theme(&self, name: &str) -> Result<()> {
        self.themes.get(name).map(|_| ())
    }

    async fn locate(&self, request: &PosterRequest) -> Result<GeoPoint> {
        let place = request.place();
        match self.geocoder.geocode(&place).await {
            Ok(point) => Ok(point),
            Err(e @ (PosterError::GeocodingError { .. } | PosterError::RequestError(_))) => {
                if let Some(point) = fallback_coordinates(&request.city) {
                    tracing::warn!(
                        "geocoding '{}' failed ({}), using fallback coordinates",
                        place,
                        e
                    );
                    Ok(point)
                } else {
                    Err(e)
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch(&self, center: GeoPoint, distance_m: u32) -> Result<MapData> {
        let bbox = BoundingBox::around(center, distance_m);

        let roads = self.overpass.fetch_roads(bbox).await?;
        tracing::debug!("fetched {} road way(s)", roads.len());

        // Posters without water are fine; posters without roads are not.
        let water = match self.overpass.fetch_water(bbox).await {
            Ok(water) => water,
            Err(e) => {
                tracing::warn!("water fetch failed, rendering without water: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("fetched {} water feature(s)", water.len());

        Ok(MapData { roads, water })
    }

    async fn render(
        &self,
        request: &PosterRequest,
        center: GeoPoint,
        map: &MapData,
    ) -> Result<Vec<u8>> {
        let theme = self.themes.get(&request.theme)?;
        self.renderer.render(request, theme, center, map)
    }

    async fn store(&self, file_name: &str, data: Vec<u8>) -> Result<String> {
        self.storage.write_file(file_name, &data).await?;
        Ok(format!("{}/{}", self.config.output_path(), file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PosterError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        geocoder_url: String,
        overpass_urls: Vec<String>,
        output_path: String,
    }

    impl MockConfig {
        fn new(geocoder_url: String, overpass_urls: Vec<String>) -> Self {
            Self {
                geocoder_url,
                overpass_urls,
                output_path: "test_output".to_string(),
            }
        }
    }

    impl PosterConfig for MockConfig {
        fn geocoder_endpoint(&self) -> &str {
            &self.geocoder_url
        }

        fn overpass_endpoints(&self) -> &[String] {
            &self.overpass_urls
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn canvas_width(&self) -> u32 {
            240
        }

        fn request_timeout_secs(&self) -> u64 {
            5
        }

        fn font_path(&self) -> Option<&str> {
            None
        }
    }

    fn request(theme: &str) -> PosterRequest {
        PosterRequest {
            city: "Piran".to_string(),
            country: "Slovenia".to_string(),
            distance_m: 2500,
            theme: theme.to_string(),
        }
    }

    fn pipeline_for(
        server: &MockServer,
    ) -> Result<SimplePosterPipeline<MockStorage, MockConfig>> {
        let config = MockConfig::new(
            server.url("/search"),
            vec![server.url("/api/interpreter")],
        );
        SimplePosterPipeline::new(MockStorage::new(), config, ThemeSet::builtin())
    }

    fn pipeline_or_skip(
        server: &MockServer,
    ) -> Option<SimplePosterPipeline<MockStorage, MockConfig>> {
        match pipeline_for(server) {
            Ok(pipeline) => Some(pipeline),
            Err(PosterError::FontError { .. }) => {
                eprintln!("no system font available, skipping pipeline test");
                None
            }
            Err(e) => panic!("pipeline construction failed: {}", e),
        }
    }

    fn mock_geocode(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"lat": "45.5285", "lon": "13.5684", "display_name": "Piran"}
                ]));
        })
    }

    #[tokio::test]
    async fn test_locate_uses_geocoder_result() {
        let server = MockServer::start();
        let mock = mock_geocode(&server);
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };

        let point = pipeline.locate(&request("gold")).await.unwrap();
        mock.assert();
        assert!((point.lat - 45.5285).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_locate_falls_back_for_known_city() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(500);
        });
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };

        let point = pipeline.locate(&request("gold")).await.unwrap();
        assert!((point.lat - 45.5285).abs() < 1e-9);
        assert!((point.lon - 13.5684).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_locate_fails_for_unknown_city() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([]));
        });
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };

        let mut req = request("gold");
        req.city = "Atlantis".to_string();
        let err = pipeline.locate(&req).await.unwrap_err();
        assert!(matches!(err, PosterError::GeocodingError { .. }));
    }

    #[tokio::test]
    async fn test_fetch_tolerates_water_failure() {
        let server = MockServer::start();
        // First overpass call (roads) succeeds, second (water) fails.
        let roads_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/interpreter")
                .body_contains("highway");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "elements": [
                        {"type": "node", "id": 1, "lat": 45.52, "lon": 13.56},
                        {"type": "node", "id": 2, "lat": 45.53, "lon": 13.57},
                        {"type": "way", "id": 10, "nodes": [1, 2],
                         "tags": {"highway": "primary"}}
                    ]
                }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/interpreter")
                .body_contains("natural");
            then.status(504);
        });
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };

        let map = pipeline
            .fetch(GeoPoint::new(45.5285, 13.5684), 2500)
            .await
            .unwrap();

        roads_mock.assert();
        assert_eq!(map.roads.len(), 1);
        assert!(map.water.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_fails_when_roads_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/interpreter");
            then.status(504);
        });
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };

        let err = pipeline
            .fetch(GeoPoint::new(45.5285, 13.5684), 2500)
            .await
            .unwrap_err();
        assert!(matches!(err, PosterError::MapDataError { .. }));
    }

    #[tokio::test]
    async fn test_render_rejects_unknown_theme() {
        let server = MockServer::start();
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };

        assert!(pipeline.check_theme("gold").is_ok());
        let err = pipeline.check_theme("vaporwave").unwrap_err();
        assert!(matches!(err, PosterError::UnknownTheme { .. }));

        let err = pipeline
            .render(
                &request("vaporwave"),
                GeoPoint::new(45.5285, 13.5684),
                &MapData::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PosterError::UnknownTheme { .. }));
    }

    #[tokio::test]
    async fn test_render_and_store_produce_a_png_artifact() {
        let server = MockServer::start();
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };

        let req = request("ink");
        let png = pipeline
            .render(&req, GeoPoint::new(45.5285, 13.5684), &MapData::default())
            .await
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 240);
        assert_eq!(decoded.height(), 320);

        let storage = pipeline.storage.clone();
        let path = pipeline.store(&req.file_name(), png).await.unwrap();
        assert_eq!(path, "test_output/piran_ink.png");
        assert!(storage.get_file("piran_ink.png").await.is_some());
    }

    #[tokio::test]
    async fn test_theme_names_cover_builtins() {
        let server = MockServer::start();
        let Some(pipeline) = pipeline_or_skip(&server) else {
            return;
        };
        let names = pipeline.theme_names();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"cyberpunk".to_string()));
    }
}
