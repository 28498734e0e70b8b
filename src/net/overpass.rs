use crate::domain::model::{BoundingBox, GeoPoint, RoadClass, RoadSegment, WaterBody};
use crate::utils::error::{PosterError, Result};
use reqwest::Client;
use std::collections::HashMap;

pub const DEFAULT_ENDPOINTS: [&str; 2] = [
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass-api.de/api/interpreter",
];

/// Overpass API client with ordered endpoint failover: each interpreter in
/// the list is tried in turn and the first success wins.
pub struct OverpassClient {
    client: Client,
    endpoints: Vec<String>,
}

impl OverpassClient {
    pub fn new(client: Client, endpoints: Vec<String>) -> Self {
        Self { client, endpoints }
    }

    /// All `highway` ways in the box, classified for rendering.
    pub async fn fetch_roads(&self, bbox: BoundingBox) -> Result<Vec<RoadSegment>> {
        let response = self.request(roads_query(bbox)).await?;
        Ok(parse_roads(response))
    }

    /// Water features in the box. Callers treat failure here as "render
    /// without water"; this method itself reports errors normally.
    pub async fn fetch_water(&self, bbox: BoundingBox) -> Result<Vec<WaterBody>> {
        let response = self.request(water_query(bbox)).await?;
        Ok(parse_water(response))
    }

    async fn request(&self, query: String) -> Result<schema::OverpassResponse> {
        let mut failures = Vec::new();

        for endpoint in &self.endpoints {
            tracing::debug!("overpass query via {}", endpoint);
            match self.try_endpoint(endpoint, &query).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("overpass endpoint {} failed: {}", endpoint, e);
                    failures.push(format!("{}: {}", endpoint, e));
                }
            }
        }

        Err(PosterError::MapDataError {
            message: format!("all overpass endpoints failed: {}", failures.join("; ")),
        })
    }

    async fn try_endpoint(&self, endpoint: &str, query: &str) -> Result<schema::OverpassResponse> {
        let response = self
            .client
            .post(endpoint)
            .body(query.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PosterError::MapDataError {
                message: format!("HTTP {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }
}

fn bbox_str(bbox: BoundingBox) -> String {
    format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east)
}

fn roads_query(bbox: BoundingBox) -> String {
    let bbox = bbox_str(bbox);
    format!(
        "[out:json][timeout:25];\
        (\
            way[\"highway\"]({bbox});\
        );\
        out body;\
        >;\
        out skel qt;"
    )
}

fn water_query(bbox: BoundingBox) -> String {
    let bbox = bbox_str(bbox);
    format!(
        "[out:json][timeout:25];\
        (\
            way[\"natural\"~\"water|bay|strait|coastline\"]({bbox});\
            way[\"waterway\"~\"riverbank|river|stream|canal|dock\"]({bbox});\
            way[\"place\"=\"sea\"]({bbox});\
        );\
        out body;\
        >;\
        out skel qt;"
    )
}

type TaggedWay = (Vec<i64>, HashMap<String, String>);

/// Split a response into a node coordinate map and the tagged ways.
fn collect_ways(response: schema::OverpassResponse) -> (HashMap<i64, GeoPoint>, Vec<TaggedWay>) {
    let mut node_map = HashMap::new();
    let mut ways = Vec::new();

    for element in response.elements {
        match element.element_type.as_str() {
            "node" => {
                if let (Some(lat), Some(lon)) = (element.lat, element.lon) {
                    node_map.insert(element.id, GeoPoint::new(lat, lon));
                }
            }
            "way" => {
                let Some(nodes) = element.nodes else {
                    continue;
                };
                ways.push((nodes, element.tags.unwrap_or_default()));
            }
            _ => {}
        }
    }

    (node_map, ways)
}

/// Resolve a way's node ids to coordinates, dropping ids the response did
/// not carry. Ways with fewer than 2 resolved points are unusable.
fn resolve_points(node_ids: &[i64], node_map: &HashMap<i64, GeoPoint>) -> Option<Vec<GeoPoint>> {
    let points: Vec<GeoPoint> = node_ids
        .iter()
        .filter_map(|id| node_map.get(id).copied())
        .collect();
    (points.len() >= 2).then_some(points)
}

fn parse_roads(response: schema::OverpassResponse) -> Vec<RoadSegment> {
    let (node_map, ways) = collect_ways(response);
    let mut roads = Vec::new();

    for (node_ids, tags) in ways {
        let Some(highway) = tags.get("highway") else {
            continue;
        };
        let Some(points) = resolve_points(&node_ids, &node_map) else {
            continue;
        };
        roads.push(RoadSegment {
            class: RoadClass::from_highway_tag(highway),
            points,
        });
    }

    roads
}

fn parse_water(response: schema::OverpassResponse) -> Vec<WaterBody> {
    let (node_map, ways) = collect_ways(response);
    let mut water = Vec::new();

    for (node_ids, _tags) in ways {
        let Some(points) = resolve_points(&node_ids, &node_map) else {
            continue;
        };
        let closed = node_ids.first() == node_ids.last();
        if closed && points.len() >= 3 {
            water.push(WaterBody::Area(points));
        } else {
            water.push(WaterBody::Channel(points));
        }
    }

    water
}

pub mod schema {
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize)]
    pub struct OverpassResponse {
        #[serde(default)]
        pub elements: Vec<Element>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Element {
        #[serde(rename = "type")]
        pub element_type: String,
        pub id: i64,
        pub lat: Option<f64>,
        pub lon: Option<f64>,
        pub nodes: Option<Vec<i64>>,
        pub tags: Option<HashMap<String, String>>,
    }
}
