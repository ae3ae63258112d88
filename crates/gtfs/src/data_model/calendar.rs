use serde::Serialize;

/// A row of `calendar.txt`. The static bundle builder emits a single
/// service that runs every day of the week, valid indefinitely from the
/// bundle's build date.
#[derive(Debug, Clone, Serialize)]
pub struct Calendar {
    pub service_id: String,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    pub start_date: String,
    pub end_date: String,
}
