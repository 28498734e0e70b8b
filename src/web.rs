use crate::config::{DEFAULT_DISTANCE_M, MAX_DISTANCE_M, MIN_DISTANCE_M};
use crate::core::PosterEngine;
use crate::domain::model::PosterRequest;
use crate::domain::ports::PosterPipeline;
use crate::utils::error::{ErrorCategory, PosterError};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{AppendHeaders, Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;

pub struct AppState<P: PosterPipeline> {
    pub engine: PosterEngine<P>,
}

#[derive(Debug, Deserialize)]
pub struct PosterQuery {
    pub city: String,
    pub country: String,
    pub distance: Option<u32>,
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub download: bool,
}

/// Checkbox/flag parameter: `1`, `true` and `on` all mean set.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(matches!(value.as_str(), "1" | "true" | "on"))
}

pub fn router<P: PosterPipeline + 'static>(state: Arc<AppState<P>>) -> Router {
    Router::new()
        .route("/", get(index::<P>))
        .route("/poster", get(poster::<P>))
        .with_state(state)
}

pub async fn serve<P: PosterPipeline + 'static>(
    engine: PosterEngine<P>,
    addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState { engine });
    let app = router(state);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index<P: PosterPipeline + 'static>(State(state): State<Arc<AppState<P>>>) -> Html<String> {
    let options = theme_options(&state.engine.pipeline().theme_names());
    Html(form_page(&options))
}

async fn poster<P: PosterPipeline + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<PosterQuery>,
) -> Response {
    let request = PosterRequest {
        city: query.city,
        country: query.country,
        distance_m: query.distance.unwrap_or(DEFAULT_DISTANCE_M),
        theme: query.theme.unwrap_or_else(|| "ink".to_string()),
    };

    if let Err(e) = validate_request(&request) {
        return error_response(&e);
    }

    tracing::info!(
        "poster request: {} / {} ({}m, theme {})",
        request.city,
        request.country,
        request.distance_m,
        request.theme
    );

    match render_poster(&state, &request).await {
        Ok(png) => png_response(png, &request, query.download),
        Err(e) => {
            tracing::error!("poster generation failed: {}", e);
            error_response(&e)
        }
    }
}

async fn render_poster<P: PosterPipeline>(
    state: &AppState<P>,
    request: &PosterRequest,
) -> Result<Vec<u8>, PosterError> {
    let pipeline = state.engine.pipeline();
    pipeline.check_theme(&request.theme)?;
    let center = pipeline.locate(request).await?;
    let map = pipeline.fetch(center, request.distance_m).await?;
    pipeline.render(request, center, &map).await
}

fn validate_request(request: &PosterRequest) -> Result<(), PosterError> {
    validate_non_empty_string("city", &request.city)?;
    validate_non_empty_string("country", &request.country)?;
    validate_range(
        "distance",
        request.distance_m,
        MIN_DISTANCE_M,
        MAX_DISTANCE_M,
    )?;
    Ok(())
}

fn png_response(png: Vec<u8>, request: &PosterRequest, download: bool) -> Response {
    let mut headers = vec![("content-type", "image/png".to_string())];
    if download {
        headers.push((
            "content-disposition",
            format!("attachment; filename=\"{}\"", request.file_name()),
        ));
    }
    (StatusCode::OK, AppendHeaders(headers), png).into_response()
}

fn theme_options(names: &[String]) -> String {
    names
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!("<option value=\"{name}\">{name}</option>")
        })
        .collect()
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn error_response(error: &PosterError) -> Response {
    let status = match error {
        PosterError::GeocodingError { .. } => StatusCode::NOT_FOUND,
        PosterError::MapDataError { .. } | PosterError::RequestError(_) => StatusCode::BAD_GATEWAY,
        e if e.category() == ErrorCategory::Configuration => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.user_friendly_message()).into_response()
}

fn form_page(theme_options: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>City Map Poster</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
label {{ display: block; margin-top: 0.8rem; }}
footer {{ margin-top: 2rem; font-size: 0.8rem; color: #666; }}
</style>
</head>
<body>
<h1>🎨 City Map Poster</h1>
<p>Generate a minimalist map poster with roads and water features.</p>
<form action="/poster" method="get">
<label>City <input name="city" value="Piran" required></label>
<label>Country <input name="country" value="Slovenia" required></label>
<label>Zoom (meters from center)
<input name="distance" type="number" min="{min}" max="{max}" value="{default}"></label>
<label>Theme <select name="theme">{theme_options}</select></label>
<label><input type="checkbox" name="download" value="true"> Download as file</label>
<button type="submit">✨ Generate poster</button>
</form>
<footer>
<p>Map data © <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors.</p>
<p>Enjoying the posters? <a href="https://ko-fi.com/">Buy me a coffee</a> ☕</p>
</footer>
</body>
</html>"#,
        min = MIN_DISTANCE_M,
        max = MAX_DISTANCE_M,
        default = DEFAULT_DISTANCE_M,
        theme_options = theme_options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_page_lists_bounds_and_attribution() {
        let page = form_page("<option value=\"ink\">ink</option>");
        assert!(page.contains("min=\"500\""));
        assert!(page.contains("max=\"10000\""));
        assert!(page.contains("value=\"2500\""));
        assert!(page.contains("OpenStreetMap"));
        assert!(page.contains("ko-fi.com"));
        assert!(page.contains("<option value=\"ink\">"));
    }

    #[test]
    fn test_download_flag_accepts_numeric_and_checkbox_forms() {
        let parse = |query: &str| {
            let uri: axum::http::Uri = format!("/poster?city=Piran&country=Slovenia{query}")
                .parse()
                .unwrap();
            Query::<PosterQuery>::try_from_uri(&uri).unwrap().0
        };

        assert!(parse("&download=1").download);
        assert!(parse("&download=true").download);
        assert!(parse("&download=on").download);
        assert!(!parse("&download=0").download);
        assert!(!parse("").download);
    }

    #[test]
    fn test_png_response_attachment_header() {
        let request = PosterRequest {
            city: "Piran".to_string(),
            country: "Slovenia".to_string(),
            distance_m: 2500,
            theme: "ink".to_string(),
        };

        let response = png_response(vec![0x89, 0x50], &request, true);
        assert_eq!(
            response.headers().get("content-disposition").unwrap(),
            "attachment; filename=\"piran_ink.png\""
        );
        assert_eq!(response.headers().get("content-type").unwrap(), "image/png");

        let inline = png_response(vec![0x89, 0x50], &request, false);
        assert!(inline.headers().get("content-disposition").is_none());
    }

    #[test]
    fn test_theme_options_escape_markup() {
        let names = vec!["ink".to_string(), "<script>\"x\"&y".to_string()];
        let options = theme_options(&names);
        assert!(options.contains("<option value=\"ink\">ink</option>"));
        assert!(options.contains("&lt;script&gt;&quot;x&quot;&amp;y"));
        assert!(!options.contains("<script>"));
    }

    #[test]
    fn test_validate_request_bounds() {
        let mut request = PosterRequest {
            city: "Piran".to_string(),
            country: "Slovenia".to_string(),
            distance_m: 2500,
            theme: "ink".to_string(),
        };
        assert!(validate_request(&request).is_ok());
        request.distance_m = 100;
        assert!(validate_request(&request).is_err());
        request.distance_m = 2500;
        request.city = " ".to_string();
        assert!(validate_request(&request).is_err());
    }
}
