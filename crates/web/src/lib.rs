use std::sync::Arc;

use axum::extract::FromRef;
use axum::Router;
use ingest::{BundleStore, FeedPublisher};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod api;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub bundles: Arc<BundleStore>,
    pub feed: Arc<FeedPublisher>,
}

pub async fn start_web_server(state: WebState, bind_host: &str, bind_port: u16) -> std::io::Result<()> {
    let routes = api::routes(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind((bind_host, bind_port)).await?;
    log::info!("web server listening on {bind_host}:{bind_port}");
    axum::serve(listener, routes.into_make_service()).await
}
