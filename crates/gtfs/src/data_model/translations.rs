use serde::Serialize;

/// A row of `translations.txt`, carrying the Kannada stop name alongside the
/// English one recorded in `stops.txt`.
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub table_name: String,
    pub field_name: String,
    pub language: String,
    pub translation: String,
    pub record_id: String,
}
