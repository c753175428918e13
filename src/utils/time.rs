use chrono::{DateTime, NaiveDate, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Naive UTC timestamp without offset, e.g. `2024-01-01T00:00:00.123456`.
/// The fraction is omitted when it is zero microseconds.
pub fn to_isoformat(dt: DateTime<Utc>) -> String {
    let naive = dt.naive_utc();
    if dt.timestamp_subsec_micros() == 0 {
        naive.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        naive.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

pub fn date_to_iso(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}
