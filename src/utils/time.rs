use chrono::{NaiveDateTime, Utc};

/// Wire format of `ts` and `created_at`: fixed width, UTC, whole seconds, literal `Z`.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const EVENT_TIME_LEN: usize = "YYYY-MM-DDTHH:MM:SSZ".len();

/// Current wall-clock instant in UTC formatted as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn now_timestamp() -> String {
    Utc::now().format(EVENT_TIME_FORMAT).to_string()
}

/// True for a strict `YYYY-MM-DDTHH:MM:SSZ` timestamp naming a real instant.
///
/// The width check keeps lexicographic order equal to chronological order;
/// chrono alone would also accept e.g. a one-digit month.
pub fn is_valid_event_time(raw: &str) -> bool {
    if raw.len() != EVENT_TIME_LEN || !raw.ends_with('Z') {
        return false;
    }
    let shape_ok = raw.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        10 => b == b'T',
        13 | 16 => b == b':',
        19 => b == b'Z',
        _ => b.is_ascii_digit(),
    });
    shape_ok && NaiveDateTime::parse_from_str(raw, EVENT_TIME_FORMAT).is_ok()
}
