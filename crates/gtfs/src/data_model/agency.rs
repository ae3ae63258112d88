use serde::Serialize;

/// A row of `agency.txt`.
#[derive(Debug, Clone, Serialize)]
pub struct Agency {
    pub agency_id: String,
    pub agency_name: String,
    pub agency_url: String,
    pub agency_timezone: String,
}

/// A row of `feed_info.txt`. `feed_version` is a content hash of the bundle,
/// used as the version string the HTTP surface reports.
#[derive(Debug, Clone, Serialize)]
pub struct FeedInfo {
    pub feed_publisher_name: String,
    pub feed_publisher_url: String,
    pub feed_lang: String,
    pub feed_version: String,
}
