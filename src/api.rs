//! The prometheus scrape endpoint.
//!
//! A scrape of `GET /metrics` runs one full collection pass inside the
//! request handler and renders the resulting registry in text exposition
//! format. No metric state survives the response.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::ToSocketAddrs;

use crate::docker::ContainerRuntime;
use crate::scrape::Scraper;

const EXPOSITION_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

async fn serve_metrics<R: ContainerRuntime>(State(scraper): State<Scraper<R>>) -> Response {
    let registry = match scraper.scrape().await {
        Ok(registry) => registry,
        Err(err) => {
            log::error!("failed to collect container metrics: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to collect container metrics",
            )
                .into_response();
        }
    };

    let mut body = String::new();
    if let Err(err) = prometheus_client::encoding::text::encode(&mut body, &registry) {
        log::error!("failed to render metrics: {}", err);
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to render metrics").into_response();
    }

    ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body).into_response()
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new<R: ContainerRuntime>(scraper: Scraper<R>) -> Self {
        let router = axum::Router::new()
            .route("/metrics", get(serve_metrics::<R>))
            .with_state(scraper);
        Self { router }
    }

    pub async fn listen(self, addr: impl ToSocketAddrs) {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("TCP Listener bind");
        axum::serve(listener, self.router.into_make_service())
            .await
            .unwrap()
    }
}
