use crate::domain::model::GeoPoint;
use crate::utils::error::{PosterError, Result};
use reqwest::Client;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Nominatim `/search` client with a single memoized lookup: repeated
/// renders of the same place hit the network once. No eviction.
pub struct NominatimClient {
    client: Client,
    endpoint: String,
    cache: Mutex<HashMap<String, GeoPoint>>,
}

impl NominatimClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a free-form place string to the first search result.
    pub async fn geocode(&self, place: &str) -> Result<GeoPoint> {
        let key = place.trim().to_lowercase();
        {
            let cache = self.cache.lock().await;
            if let Some(point) = cache.get(&key) {
                tracing::debug!("geocode cache hit for '{}'", place);
                return Ok(*point);
            }
        }

        tracing::debug!("geocoding '{}' via {}", place, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PosterError::GeocodingError {
                place: place.to_string(),
                reason: format!("geocoder returned HTTP {}", response.status()),
            });
        }

        let results: Vec<schema::SearchResult> = response.json().await?;
        let first = results.first().ok_or_else(|| PosterError::GeocodingError {
            place: place.to_string(),
            reason: "no results".to_string(),
        })?;

        let point = first.point().ok_or_else(|| PosterError::GeocodingError {
            place: place.to_string(),
            reason: "result coordinates were not numeric".to_string(),
        })?;

        let mut cache = self.cache.lock().await;
        cache.insert(key, point);
        Ok(point)
    }
}

pub mod schema {
    use crate::domain::model::GeoPoint;
    use serde::Deserialize;

    /// One Nominatim search hit. Nominatim serializes lat/lon as strings.
    #[derive(Debug, Deserialize)]
    pub struct SearchResult {
        pub lat: String,
        pub lon: String,
        #[serde(default)]
        pub display_name: String,
    }

    impl SearchResult {
        pub fn point(&self) -> Option<GeoPoint> {
            let lat = self.lat.parse().ok()?;
            let lon = self.lon.parse().ok()?;
            Some(GeoPoint::new(lat, lon))
        }
    }
}
