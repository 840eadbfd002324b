use chrono::{NaiveDate, NaiveDateTime};

/// Arrival instant of a route's first stop ("route start", never filtered out)
pub const ROUTE_START: NaiveDateTime = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => match date.and_hms_opt(0, 0, 0) {
        Some(dt) => dt,
        None => panic!("Invalid route start"),
    },
    None => panic!("Invalid route start date"),
};

/// Departure instant of a route's last stop ("route end")
///
/// Upstream writes the month overflow of `3000-12-31` built in local time, so
/// decoded values land anywhere around 3001-01-31. Every departure from
/// [`ROUTE_END_YEAR`] on is normalised to this value.
pub const ROUTE_END: NaiveDateTime = match NaiveDate::from_ymd_opt(3001, 1, 31) {
    Some(date) => match date.and_hms_opt(0, 0, 0) {
        Some(dt) => dt,
        None => panic!("Invalid route end"),
    },
    None => panic!("Invalid route end date"),
};

/// First year treated as "no departure"
pub const ROUTE_END_YEAR: i32 = 3000;

/// Stations shown around the reference station when nothing else is configured
pub const DEFAULT_TARGET_STATIONS: usize = 7;

/// Minutes before "now" shown at zoom 1
pub const LOOK_BACK_MINUTES: f64 = 35.0;

/// Minutes after "now" shown at zoom 1
pub const LOOK_AHEAD_MINUTES: f64 = 105.0;

/// Minutes added to both ends of the window when filtering timetable rows
pub const WINDOW_SLACK_MINUTES: f64 = 10.0;

/// Vertical pixel offset separating tracks of one station
pub const TRACK_OFFSET_PX: f64 = 4.0;

/// Spacing used for every leg when no mileage could be resolved
pub const FALLBACK_DISTANCE: f64 = 1.0;

/// Marker for a leg whose distance has not been resolved yet
pub const UNRESOLVED_DISTANCE: f64 = -1.0;

/// Base URL of the EDR backend used by the HTTP timetable source
pub const DEFAULT_API_BASE: &str = "/api";
