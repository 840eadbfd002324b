use chrono::{DateTime, Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::constants::{LOOK_AHEAD_MINUTES, LOOK_BACK_MINUTES, ROUTE_END, ROUTE_END_YEAR, ROUTE_START};

/// Visible time range of the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Window around `now`: a 1:3 look-back to look-ahead ratio, shrunk by `zoom`
    ///
    /// Non-positive zoom factors are treated as 1.
    #[must_use]
    pub fn around(now: NaiveDateTime, zoom: f64) -> Self {
        Self::with_span(now, zoom, LOOK_BACK_MINUTES, LOOK_AHEAD_MINUTES)
    }

    #[must_use]
    pub fn with_span(now: NaiveDateTime, zoom: f64, look_back_minutes: f64, look_ahead_minutes: f64) -> Self {
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        Self {
            start: now - minutes(look_back_minutes / zoom),
            end: now + minutes(look_ahead_minutes / zoom),
        }
    }

    /// Copy of this window with both ends pushed outward by `slack_minutes`
    #[must_use]
    pub fn widened(&self, slack_minutes: f64) -> Self {
        let slack = minutes(slack_minutes);
        Self {
            start: self.start - slack,
            end: self.end + slack,
        }
    }

    /// Whether `[from, to]` overlaps this window (inclusive at both ends)
    #[must_use]
    pub fn intersects(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        from <= self.end && to >= self.start
    }

    #[must_use]
    pub fn span_ms(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_milliseconds()
    }
}

/// Whole and fractional minutes as a chrono duration, rounded to the millisecond
#[must_use]
pub fn minutes(value: f64) -> Duration {
    // Window spans are a few hours at most, well inside i64 milliseconds
    #[allow(clippy::cast_possible_truncation)]
    let ms = (value * 60_000.0).round() as i64;
    Duration::milliseconds(ms)
}

/// Milliseconds from `origin` to `time`
#[must_use]
pub fn millis_since(origin: NaiveDateTime, time: NaiveDateTime) -> i64 {
    time.signed_duration_since(origin).num_milliseconds()
}

pub(crate) fn route_start() -> NaiveDateTime {
    ROUTE_START
}

pub(crate) fn route_end() -> NaiveDateTime {
    ROUTE_END
}

/// Route start sentinel check: anything at or before the epoch
#[must_use]
pub fn is_route_start(time: NaiveDateTime) -> bool {
    time <= ROUTE_START
}

/// Parse an upstream instant
///
/// Accepts RFC 3339 (converted to UTC) and naive ISO timestamps with optional
/// fractional seconds.
///
/// # Errors
///
/// Returns an error if the string matches none of the accepted formats.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.naive_utc()),
        Err(rfc_err) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|_| rfc_err),
    }
}

/// Serde adapter for arrival instants: `null`, missing or pre-epoch becomes `ROUTE_START`
pub(crate) mod arrival_serde {
    use super::instant_or;
    use crate::constants::ROUTE_START;
    use chrono::NaiveDateTime;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(datetime: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::serialize_instant(datetime, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        instant_or(deserializer, ROUTE_START).map(super::normalize_arrival)
    }
}

/// Serde adapter for departure instants: `null`, missing or far-future becomes `ROUTE_END`
pub(crate) mod departure_serde {
    use super::instant_or;
    use crate::constants::ROUTE_END;
    use chrono::NaiveDateTime;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(datetime: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::serialize_instant(datetime, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        instant_or(deserializer, ROUTE_END).map(super::normalize_departure)
    }
}

fn serialize_instant<S>(datetime: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn instant_or<'de, D>(deserializer: D, fallback: NaiveDateTime) -> Result<NaiveDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(fallback),
        Some(s) => parse_instant(s).map_err(serde::de::Error::custom),
    }
}

/// Route end sentinel check, used when deciding whether a departure is real
///
/// Matches by year since upstream builds the sentinel in its local time zone.
#[must_use]
pub fn is_route_end(time: NaiveDateTime) -> bool {
    time.year() >= ROUTE_END_YEAR
}

fn normalize_arrival(time: NaiveDateTime) -> NaiveDateTime {
    if is_route_start(time) {
        ROUTE_START
    } else {
        time
    }
}

fn normalize_departure(time: NaiveDateTime) -> NaiveDateTime {
    if is_route_end(time) {
        ROUTE_END
    } else {
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stop;
    use crate::test_support::at;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_window_around_keeps_one_to_three_ratio() {
        let window = TimeWindow::around(at(12, 0), 1.0);
        assert_eq!(window.start, at(11, 25));
        assert_eq!(window.end, at(13, 45));
    }

    #[test]
    fn test_window_shrinks_with_zoom() {
        let window = TimeWindow::around(at(12, 0), 2.0);
        assert_eq!(window.start, at(11, 42) + Duration::seconds(30));
        assert_eq!(window.end, at(12, 52) + Duration::seconds(30));
    }

    #[test]
    fn test_window_ignores_non_positive_zoom() {
        assert_eq!(TimeWindow::around(at(12, 0), 0.0), TimeWindow::around(at(12, 0), 1.0));
    }

    #[test]
    fn test_widened_window() {
        let window = TimeWindow::around(at(12, 0), 1.0).widened(10.0);
        assert_eq!(window.start, at(11, 15));
        assert_eq!(window.end, at(13, 55));
    }

    #[test]
    fn test_intersects() {
        let window = TimeWindow { start: at(10, 0), end: at(11, 0) };
        assert!(window.intersects(at(9, 0), at(10, 0)));
        assert!(window.intersects(at(10, 30), at(10, 31)));
        assert!(window.intersects(at(9, 0), at(12, 0)));
        assert!(!window.intersects(at(11, 1), at(11, 5)));
        assert!(!window.intersects(at(8, 0), at(9, 59)));
    }

    #[test]
    fn test_parse_instant_naive() {
        let time = parse_instant("2024-05-01T08:30:15").expect("should parse");
        assert_eq!(time.hour(), 8);
        assert_eq!(time.minute(), 30);
        assert_eq!(time.second(), 15);
    }

    #[test]
    fn test_parse_instant_rfc3339_converts_to_utc() {
        let time = parse_instant("2024-05-01T08:30:00+02:00").expect("should parse");
        assert_eq!(time, at(6, 30));
    }

    #[test]
    fn test_parse_instant_fractional_seconds() {
        let time = parse_instant("2024-05-01T08:30:00.500").expect("should parse");
        assert_eq!(time.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_parse_instant_invalid() {
        assert!(parse_instant("08:30").is_err());
        assert!(parse_instant("").is_err());
    }

    #[test]
    fn test_sentinels() {
        assert!(is_route_start(ROUTE_START));
        assert!(is_route_end(ROUTE_END));
        assert!(!is_route_start(at(0, 0)));
        assert!(!is_route_end(at(23, 59)));
    }

    fn decode_row(arrival: &str, departure: &str) -> Stop {
        let json = format!(
            r#"{{"trainNoLocal":"1","pointId":"A","scheduledArrivalObject":{arrival},"scheduledDepartureObject":{departure},"stopTypeNumber":1}}"#
        );
        serde_json::from_str(&json).expect("row should decode")
    }

    #[test]
    fn test_upstream_route_end_is_normalised() {
        // Month 12 overflows into January 3001 upstream
        for departure in [
            r#""3001-01-31T00:00:00.000Z""#,
            r#""3001-01-30T23:00:00.000Z""#,
            r#""3001-01-31T00:00:00+01:00""#,
            r#""3000-12-31T00:00:00""#,
        ] {
            let row = decode_row(r#""2024-05-01T10:00:00.000Z""#, departure);
            assert_eq!(row.scheduled_departure, ROUTE_END, "departure {departure}");
            assert!(is_route_end(row.scheduled_departure));
            assert_eq!(row.scheduled_arrival, at(10, 0));
        }
    }

    #[test]
    fn test_upstream_route_start_is_normalised() {
        for arrival in [
            r#""1970-01-01T00:00:00.000Z""#,
            r#""1970-01-01T01:00:00+01:00""#,
            r#""1969-12-31T23:00:00""#,
        ] {
            let row = decode_row(arrival, r#""2024-05-01T10:00:00""#);
            assert_eq!(row.scheduled_arrival, ROUTE_START, "arrival {arrival}");
        }
    }

    #[test]
    fn test_real_instants_are_not_sentinels() {
        let row = decode_row(r#""2999-12-31T23:59:00""#, r#""2999-12-31T23:59:00""#);
        assert!(!is_route_end(row.scheduled_departure));
        assert!(!is_route_start(row.scheduled_arrival));
        let epoch_plus = NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 1))
            .expect("valid time");
        assert!(!is_route_start(epoch_plus));
    }
}
