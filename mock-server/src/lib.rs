use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Smallest valid PNG: a single transparent pixel.
pub const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

/// Manipulation codes the service understands.
const CODES: &[&str] = &["w", "h", "c", "g", "r"];

/// A fetch request as decoded by the mock service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchRecord {
    pub id: Uuid,
    pub client: String,
    pub manipulations: Vec<(String, String)>,
    pub source: String,
}

pub type Log = Arc<RwLock<Vec<FetchRecord>>>;

pub fn app() -> Router {
    let log: Log = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/requests", get(list_requests))
        .route("/{client}/images/fetch/{*rest}", get(fetch_image))
        .with_state(log)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Split the path after `/images/fetch/` into manipulations and source.
///
/// The first segment is a manipulation list only when every comma-separated
/// token is `<code>_<value>` with a known code; otherwise the whole rest is
/// the source.
pub fn decode_fetch_path(rest: &str) -> (Vec<(String, String)>, String) {
    let rest = rest.trim_start_matches('/');
    if let Some((first, source)) = rest.split_once('/') {
        if let Some(manipulations) = parse_manipulations(first) {
            return (manipulations, source.to_string());
        }
    }
    (Vec::new(), rest.to_string())
}

fn parse_manipulations(segment: &str) -> Option<Vec<(String, String)>> {
    segment
        .split(',')
        .map(|token| {
            let (code, value) = token.split_once('_')?;
            (CODES.contains(&code) && !value.is_empty()).then(|| (code.to_string(), value.to_string()))
        })
        .collect()
}

async fn list_requests(State(log): State<Log>) -> Json<Vec<FetchRecord>> {
    Json(log.read().await.clone())
}

async fn fetch_image(State(log): State<Log>, Path((client, rest)): Path<(String, String)>) -> Response {
    let (manipulations, source) = decode_fetch_path(&rest);
    if source.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let record = FetchRecord {
        id: Uuid::new_v4(),
        client,
        manipulations,
        source,
    };
    tracing::info!(id = %record.id, client = %record.client, source = %record.source, "fetch");
    let id = record.id.to_string();
    log.write().await.push(record);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/png".to_string()), (header::HeaderName::from_static("x-request-id"), id)],
        PIXEL_PNG,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn decodes_manipulations_and_source() {
        let (manipulations, source) = decode_fetch_path("w_100,h_100,c_fit,g_top,r_50/https://example.com/logo.jpg");
        assert_eq!(
            manipulations,
            pairs(&[("w", "100"), ("h", "100"), ("c", "fit"), ("g", "top"), ("r", "50")])
        );
        assert_eq!(source, "https://example.com/logo.jpg");
    }

    #[test]
    fn source_without_manipulations() {
        let (manipulations, source) = decode_fetch_path("https://example.com/logo.jpg");
        assert!(manipulations.is_empty());
        assert_eq!(source, "https://example.com/logo.jpg");
    }

    #[test]
    fn unknown_code_is_treated_as_source() {
        let (manipulations, source) = decode_fetch_path("x_1/logo.jpg");
        assert!(manipulations.is_empty());
        assert_eq!(source, "x_1/logo.jpg");
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = FetchRecord {
            id: Uuid::nil(),
            client: "imaginary".to_string(),
            manipulations: pairs(&[("w", "100")]),
            source: "logo.jpg".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["manipulations"][0][0], "w");
        let back: FetchRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn pixel_png_has_signature() {
        assert_eq!(&PIXEL_PNG[..8], b"\x89PNG\r\n\x1a\n");
    }
}
