use thiserror::Error;

/// Errors the fetcher's inner request path can fail with. Never propagated
/// past [`crate::fetcher::fetch_route_data`], which turns every variant
/// into an empty stop list plus a logged warning.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("upstream reported issuccess=false")]
    Unsuccessful,
}

/// Errors [`crate::scheduler::populate_schedule`] can hit for a single
/// route_key. The caller logs and skips the route rather than aborting the
/// whole run.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("route_key {0:?} has no child_id mapping")]
    MissingChildId(String),
    #[error("route_key {0:?} has no parent_id mapping")]
    MissingParentId(String),
}

/// Errors the static bundle loader/builder loop can hit on a given day's
/// run; logged and the previous bundle (if any) stays published.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("reading input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing input file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("packing zip archive: {0}")]
    Zip(#[source] std::io::Error),
}
