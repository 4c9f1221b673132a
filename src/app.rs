use std::net::SocketAddr;

use axum::{
    http::HeaderValue,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, DEFAULT_FRONTEND_URL};
use crate::state::AppState;
use crate::{analysis, standards};

pub fn build_app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config)?;
    Ok(Router::new()
        .route("/", get(health))
        .nest(
            "/api",
            Router::new()
                .merge(analysis::router())
                .merge(standards::router()),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        ))
}

/// GET /
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "message": "Carb Advisor API" }))
}

/// Browser access is limited to the configured frontend plus local dev.
fn cors_layer(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let mut origins = vec![config.frontend_url.as_str()];
    if config.frontend_url != DEFAULT_FRONTEND_URL {
        origins.push(DEFAULT_FRONTEND_URL);
    }
    let origins = origins
        .into_iter()
        .map(|o| {
            HeaderValue::from_str(o.trim_end_matches('/'))
                .map_err(|e| anyhow::anyhow!("invalid FRONTEND_URL {:?}: {}", o, e))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    // credentials rule out `*`, so methods and headers are mirrored instead
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
