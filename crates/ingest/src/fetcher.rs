use std::time::Duration;

use model::upstream::{RouteDetailsRequest, RouteDetailsResponse, StopRecord};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::Config;
use crate::error::FetchError;

fn request_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(HeaderName::from_static("lan"), HeaderValue::from_static("en"));
    headers.insert(HeaderName::from_static("devicetype"), HeaderValue::from_static("WEB"));
    headers
}

/// `POST /SearchByRouteDetails_v4` for `parent_id`, flattened into a single
/// list of stop records. Never fails outward: network errors, non-200
/// statuses, `issuccess=false` and parse failures all become an empty list
/// plus a logged warning.
pub async fn fetch_route_data(client: &reqwest::Client, config: &Config, parent_id: i64) -> Vec<StopRecord> {
    match fetch(client, config, parent_id).await {
        Ok(stops) => stops,
        Err(error) => {
            log::warn!("fetch_route_data(parent_id={parent_id}) failed: {error}");
            Vec::new()
        }
    }
}

async fn fetch(
    client: &reqwest::Client,
    config: &Config,
    parent_id: i64,
) -> Result<Vec<StopRecord>, FetchError> {
    let url = format!("{}/SearchByRouteDetails_v4", config.api_base_url);

    let response = client
        .post(&url)
        .headers(request_headers())
        .json(&RouteDetailsRequest::new(parent_id))
        .timeout(Duration::from_secs(10))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let body: RouteDetailsResponse = response.json().await?;
    if !body.issuccess {
        return Err(FetchError::Unsuccessful);
    }

    Ok(body.flatten())
}
