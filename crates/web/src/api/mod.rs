use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{extract::State, Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::WebState;

pub fn routes(state: WebState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/gtfs.zip", get(gtfs_zip))
        .route("/gtfs-rt.proto", get(gtfs_realtime))
        .route("/gtfs-version", get(gtfs_version))
        .layer(cors)
        .with_state(state)
}

async fn gtfs_zip(State(state): State<WebState>) -> impl IntoResponse {
    match state.bundles.zip_bytes() {
        Some(bytes) => ([(header::CONTENT_TYPE, "application/zip")], bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn gtfs_realtime(State(state): State<WebState>) -> impl IntoResponse {
    let bytes = state.feed.serialize();
    (
        [
            (header::CONTENT_TYPE, "application/x-protobuf"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        bytes,
    )
}

async fn gtfs_version(State(state): State<WebState>) -> impl IntoResponse {
    match state.bundles.version() {
        Some(version) => Json(json!({ "version": version })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use ingest::{BundleStore, FeedPublisher};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> WebState {
        WebState {
            bundles: Arc::new(BundleStore::new()),
            feed: Arc::new(FeedPublisher::new()),
        }
    }

    #[tokio::test]
    async fn gtfs_zip_404s_before_first_build() {
        let response = routes(state())
            .oneshot(Request::builder().uri("/gtfs.zip").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn gtfs_rt_always_200s_with_protobuf_content_type() {
        let response = routes(state())
            .oneshot(Request::builder().uri("/gtfs-rt.proto").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/x-protobuf"
        );
    }

    #[tokio::test]
    async fn gtfs_version_404s_before_first_build() {
        let response = routes(state())
            .oneshot(Request::builder().uri("/gtfs-version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
