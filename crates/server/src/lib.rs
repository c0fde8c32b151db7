//! clinic-server library crate
//!
//! Exposes `build_app`, `config` and `state` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

mod ai;
pub mod config;
mod error;
mod geocode;
mod middleware;
mod routes;
pub mod state;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::GeminiClient;
use config::Config;
use geocode::GeocodeClient;
use state::AppState;

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // External collaborators (None if no API key is set)
    let gemini_client: Option<GeminiClient> = config.gemini_api_key.as_ref().and_then(|key| {
        GeminiClient::new(key.clone(), config.gemini_model.clone(), config.gemini_timeout)
            .inspect_err(|e| tracing::error!(error = %e, "Gemini client disabled"))
            .ok()
    });
    let geocode_client: Option<GeocodeClient> = config.geocode_api_key.as_ref().and_then(|key| {
        GeocodeClient::new(key.clone(), config.geocode_timeout)
            .inspect_err(|e| tracing::error!(error = %e, "Geocoding client disabled"))
            .ok()
    });

    // Query routes (rate limited)
    let query_routes = Router::new()
        .merge(routes::search_routes())
        .nest("/api", routes::api_routes())
        .layer(Extension(gemini_client))
        .layer(Extension(geocode_client))
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // Install Prometheus metrics recorder.
    // Use build_recorder() + set_global_recorder() so that repeated calls
    // (e.g. in integration tests) don't panic; the second install is
    // silently ignored and we still get a valid handle for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    // Operational routes
    let public_routes = Router::new()
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::render))
        .layer(Extension(prometheus_handle));

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(public_routes)
        .merge(query_routes)
        .with_state(state)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
