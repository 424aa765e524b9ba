//! AgriGen - Analysis Server
//!
//! Predicts plant traits from leaf images, resolves them to one of 27
//! genotypes and recommends breeding partners and replacement hybrids.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::{WeatherClient, WeatherProvider};
use services::{HybridCatalog, TraitPredictor};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<HybridCatalog>,
    pub weather: Arc<dyn WeatherProvider>,
    pub predictor: Arc<TraitPredictor>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agrigen_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting AgriGen Analysis Server");
    tracing::info!("Environment: {}", config.environment);

    // Refuse to start on inconsistent constant tables
    shared::verify_static_tables()?;
    tracing::info!("Genotype tables verified: {} genotypes", shared::genotypes().len());

    let weather = WeatherClient::new(
        config.weather.api_endpoint.clone(),
        config.weather.api_key.clone(),
        config.weather.timeout(),
    )?;
    if !weather.is_enabled() {
        tracing::warn!("No weather API key configured, weather scores will use fallbacks");
    }

    let predictor = TraitPredictor::from_config(&config.inference)?;
    tracing::info!("Trait classifiers loaded: {}", predictor.models_loaded());

    let catalog = HybridCatalog::load(&config.catalog.path).await?;
    if catalog.is_empty() {
        tracing::info!("Hybrid catalog empty, built-in hybrids will be recommended");
    } else {
        tracing::info!("Hybrids available: {}", catalog.len());
    }

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        catalog: Arc::new(catalog),
        weather: Arc::new(weather),
        predictor: Arc::new(predictor),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", routes::api_routes())
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    const BOUNDARY: &str = "agrigen-test-boundary";

    fn test_state(config: Config) -> AppState {
        // No API key: the weather client reports unavailable without any I/O
        let weather = WeatherClient::new(
            "http://127.0.0.1:9/weather".to_string(),
            String::new(),
            Duration::from_secs(1),
        )
        .unwrap();

        AppState {
            config: Arc::new(config),
            catalog: Arc::new(HybridCatalog::default()),
            weather: Arc::new(weather),
            predictor: Arc::new(TraitPredictor::new()),
        }
    }

    fn app() -> Router {
        create_app(test_state(Config::default()))
    }

    fn multipart_request(
        uri: &str,
        filename: Option<&str>,
        contents: &[u8],
        location: Option<&str>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(location) = location {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"location\"\r\n\r\n{location}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(filename) = filename {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(contents);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_root() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "AgriGen Backend");
        assert_eq!(body["status"], "Active");
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["models_loaded"], 0);
        assert_eq!(body["hybrids_available"], 0);
        assert_eq!(body["genotypes_mapped"], 27);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_list_genotypes() {
        let request = Request::get("/api/genotypes").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 27);
        assert_eq!(body["genotypes"][0]["genotype_id"], "G1");
        assert_eq!(body["genotypes"][0]["tier"], "superior");
        assert_eq!(body["genotypes"][26]["genotype_id"], "G27");
        assert_eq!(body["genotypes"][26]["traits"]["yield"], "Low");
    }

    #[tokio::test]
    async fn test_complete_analysis_without_models() {
        let request = multipart_request(
            "/api/complete",
            Some("leaf.JPG"),
            b"\xFF\xD8\xFF\xE0fake-jpeg",
            Some("Mysore,IN"),
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["analysis_id"].is_string());
        assert_eq!(body["predicted_traits"]["yield"], "Medium");
        assert_eq!(body["predicted_genotype"]["genotype_id"], "G14");
        assert_eq!(body["genotype_fallback"], false);
        assert_eq!(body["weather"]["success"], false);
        assert_eq!(body["weather"]["location"], "Mysore,IN");

        let breeding = body["breeding_recommendations"].as_array().unwrap();
        assert_eq!(breeding.len(), 3);
        assert!(breeding.iter().all(|r| r["weather_suitability"] == 50));
        assert_eq!(body["replacement_recommendations"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_complete_analysis_default_location() {
        let request = multipart_request("/api/complete", Some("leaf.png"), b"png", None);
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weather"]["location"], "Bangalore,IN");
    }

    #[tokio::test]
    async fn test_upload_validation() {
        let (status, body) = send(
            app(),
            multipart_request("/api/complete", None, b"", Some("Pune,IN")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "NO_FILE_UPLOADED");

        let (status, body) = send(
            app(),
            multipart_request("/api/complete", Some("leaf.gif"), b"GIF89a", None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FILE_TYPE");
        assert_eq!(body["error"]["message"], "Invalid file type. Use JPG or PNG");

        let (status, body) = send(
            app(),
            multipart_request("/api/analyze", Some(""), b"data", None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMPTY_FILENAME");
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let mut config = Config::default();
        config.server.max_upload_bytes = 64;
        let app = create_app(test_state(config));

        let request = multipart_request("/api/complete", Some("leaf.jpg"), &[0u8; 4096], None);
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_analyze_returns_default_traits() {
        let request = multipart_request("/api/analyze", Some("leaf.jpeg"), b"jpeg", None);
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "predicted_traits": {
                    "yield": "Medium",
                    "disease_resistance": "Moderate",
                    "stress_tolerance": "Medium"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_recommend_from_traits() {
        let request = json_request(
            "/api/recommend",
            json!({
                "traits": {
                    "yield": "High",
                    "disease_resistance": "Resistant",
                    "stress_tolerance": "High"
                },
                "location": "Pune,IN"
            }),
        );
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["predicted_genotype"]["genotype_id"], "G1");
        let partners: Vec<&str> = body["breeding_recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["partner_genotype"].as_str().unwrap())
            .collect();
        assert_eq!(partners, vec!["G2", "G3", "G4"]);
    }

    #[tokio::test]
    async fn test_recommend_rejects_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/recommend")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"traits\": "))
            .unwrap();
        let (status, body) = send(app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "body");
    }
}
