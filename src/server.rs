//! HTTP endpoint exposing the metric series for scraping.
//!
//! Scrapes read whatever the series currently hold, entirely decoupled from
//! the refresh cadence; the refresh thread is the only writer.

use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use log::info;
use std::sync::Arc;

use crate::metrics::DeviceMetrics;

pub async fn run(listen_addr: &str, metrics: Arc<DeviceMetrics>) -> Result<(), String> {
    let app = Router::new().route("/metrics", get(serve_metrics)).with_state(metrics);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(|e| format!("binding {} failed: {}", listen_addr, e))?;
    info!("Serving metrics on http://{}/metrics", listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("metrics server failed: {}", e))
}

async fn serve_metrics(State(metrics): State<Arc<DeviceMetrics>>) -> impl IntoResponse {
    ([(CONTENT_TYPE, prometheus::TEXT_FORMAT)], metrics.export())
}
