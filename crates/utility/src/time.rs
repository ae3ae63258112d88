use chrono::{DateTime, Duration, Local, TimeZone};

/// Splits an `HH:MM` string into its hour/minute components.
pub fn parse_hh_mm(value: &str) -> Option<(u32, u32)> {
    let mut parts = value.splitn(2, ':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    Some((hour, minute))
}

/// Splits an upstream `HHMM` integer (e.g. `905` for `09:05`) into hour/minute.
pub fn hhmm_parts(value: i64) -> (i64, i64) {
    (value / 100, value % 100)
}

/// Formats an `HHMM` integer as `HH:MM:00`, matching the scheme the
/// static bundle and the scheduler both anchor trip starts with.
pub fn hhmm_to_hms(value: i64) -> String {
    let (hour, minute) = hhmm_parts(value);
    format!("{:02}:{:02}:00", hour, minute)
}

/// Formats a minute-of-service-day offset as an arrival `HH:MM:00`, allowing
/// the hour to run past 24 for trips that continue into the next service
/// day.
pub fn format_service_time(total_minutes: i64) -> String {
    let hour = total_minutes / 60;
    let minute = total_minutes % 60;
    format!("{:02}:{:02}:00", hour, minute)
}

/// Same offset formatted as a departure `HH:MM:10`, matching the ten-second
/// dwell the upstream static feed always encodes between a stop's arrival
/// and departure.
pub fn format_service_time_departure(total_minutes: i64) -> String {
    let hour = total_minutes / 60;
    let minute = total_minutes % 60;
    format!("{:02}:{:02}:10", hour, minute)
}

/// Anchors an `HH:MM:SS` trip start on today's local date, rolling forward
/// to tomorrow if that instant has already passed.
pub fn anchor_trip_start(hour: u32, minute: u32, second: u32) -> Option<DateTime<Local>> {
    let now = Local::now();
    let today = now.date_naive().and_hms_opt(hour, minute, second)?;
    let anchored = Local.from_local_datetime(&today).single()?;
    Some(if anchored <= now {
        anchored + Duration::days(1)
    } else {
        anchored
    })
}

/// Anchors an `HH:MM` scheduled timestamp the way the transformer does: on
/// the current local date, rolled forward a day only if the anchored
/// instant is more than six hours in the past. Returns unix seconds.
pub fn roll_forward_hh_mm(value: &str) -> Option<i64> {
    let (hour, minute) = parse_hh_mm(value)?;
    let now = Local::now();
    let today = now.date_naive().and_hms_opt(hour, minute, 0)?;
    let mut anchored = Local.from_local_datetime(&today).single()?;
    if anchored < now - Duration::hours(6) {
        anchored += Duration::days(1);
    }
    Some(anchored.timestamp())
}

/// Anchors an `HH:MM` timestamp on `date` rather than the wall-clock date,
/// used by the transformer to match a vehicle's `sch_tripstarttime` against
/// a job's already-anchored `trip_time`.
pub fn anchor_hh_mm_on_date(date: chrono::NaiveDate, value: &str) -> Option<DateTime<Local>> {
    let (hour, minute) = parse_hh_mm(value)?;
    let naive = date.and_hms_opt(hour, minute, 0)?;
    Local.from_local_datetime(&naive).single()
}

/// Parses an upstream `"dd-MM-yyyy HH:mm:ss"` local timestamp into unix
/// seconds, as used for `lastrefreshon`.
pub fn parse_upstream_datetime(value: &str) -> Option<i64> {
    let naive = chrono::NaiveDateTime::parse_from_str(value, "%d-%m-%Y %H:%M:%S").ok()?;
    Local.from_local_datetime(&naive).single().map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_hh_mm_on_given_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 7, 27).unwrap();
        let anchored = anchor_hh_mm_on_date(date, "09:05").unwrap();
        assert_eq!(anchored.date_naive(), date);
        assert_eq!((anchored.format("%H:%M").to_string()), "09:05");
    }

    #[test]
    fn parses_upstream_datetime_format() {
        let seconds = parse_upstream_datetime("27-07-2026 09:05:30").unwrap();
        let recovered = Local.timestamp_opt(seconds, 0).unwrap();
        assert_eq!(recovered.format("%d-%m-%Y %H:%M:%S").to_string(), "27-07-2026 09:05:30");
    }
}
