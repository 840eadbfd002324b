use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use super::StationId;
use crate::constants::{ROUTE_END, ROUTE_START};
use crate::time::{arrival_serde, departure_serde};

/// How a train calls at a station (upstream codes 0/1/2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StopType {
    /// Runs through without dwelling
    #[default]
    Pass,
    /// Scheduled stop the train must make
    RequiredStop,
    /// Conditional stop, made only on request
    OptionalStop,
}

impl StopType {
    #[must_use]
    pub fn is_stop(self) -> bool {
        !matches!(self, StopType::Pass)
    }
}

impl TryFrom<u8> for StopType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(StopType::Pass),
            1 => Ok(StopType::RequiredStop),
            2 => Ok(StopType::OptionalStop),
            other => Err(format!("Unknown stop type code: {other}")),
        }
    }
}

impl From<StopType> for u8 {
    fn from(stop_type: StopType) -> Self {
        match stop_type {
            StopType::Pass => 0,
            StopType::RequiredStop => 1,
            StopType::OptionalStop => 2,
        }
    }
}

/// One timetable row: a single train at a single station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(alias = "trainNoLocal")]
    pub train_number: String,
    #[serde(alias = "pointId")]
    pub station_point_id: StationId,
    #[serde(default, alias = "nameForPerson")]
    pub station_name: Option<String>,
    #[serde(default, alias = "fromPostId")]
    pub from_station_id: Option<StationId>,
    #[serde(default, alias = "toPostId")]
    pub to_station_id: Option<StationId>,
    #[serde(
        with = "arrival_serde",
        default = "crate::time::route_start",
        alias = "scheduledArrivalObject",
        alias = "arrivalTime"
    )]
    pub scheduled_arrival: NaiveDateTime,
    #[serde(
        with = "departure_serde",
        default = "crate::time::route_end",
        alias = "scheduledDepartureObject",
        alias = "departureTime"
    )]
    pub scheduled_departure: NaiveDateTime,
    #[serde(default, alias = "stopTypeNumber")]
    pub stop_type: StopType,
    #[serde(default)]
    pub track: Option<u32>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub platform: Option<String>,
    #[serde(default, alias = "mileage")]
    pub mileage_km: Option<f64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub line: Option<String>,
    #[serde(default)]
    pub train_type: String,
    #[serde(default)]
    pub max_speed: Option<u32>,
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.and_then(|raw| match raw {
        Raw::Text(text) if text.trim().is_empty() => None,
        Raw::Text(text) => Some(text),
        Raw::Number(number) => Some(number.to_string()),
    }))
}

impl Stop {
    /// Row for `train_number` at `station` with no links, times at the sentinels
    #[must_use]
    pub fn new(train_number: impl Into<String>, station: impl Into<StationId>) -> Self {
        Self {
            train_number: train_number.into(),
            station_point_id: station.into(),
            station_name: None,
            from_station_id: None,
            to_station_id: None,
            scheduled_arrival: ROUTE_START,
            scheduled_departure: ROUTE_END,
            stop_type: StopType::Pass,
            track: None,
            platform: None,
            mileage_km: None,
            line: None,
            train_type: String::new(),
            max_speed: None,
        }
    }

    #[must_use]
    pub fn with_times(mut self, arrival: NaiveDateTime, departure: NaiveDateTime) -> Self {
        self.scheduled_arrival = arrival;
        self.scheduled_departure = departure;
        self
    }

    #[must_use]
    pub fn with_links(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.from_station_id = from.map(StationId::from);
        self.to_station_id = to.map(StationId::from);
        self
    }

    #[must_use]
    pub fn with_stop_type(mut self, stop_type: StopType, track: Option<u32>) -> Self {
        self.stop_type = stop_type;
        self.track = track;
        self
    }

    #[must_use]
    pub fn with_mileage(mut self, line: &str, mileage_km: f64) -> Self {
        self.line = Some(line.to_string());
        self.mileage_km = Some(mileage_km);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.station_name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_train_type(mut self, train_type: &str) -> Self {
        self.train_type = train_type.to_string();
        self
    }

    /// Next station of this train's route, if any
    #[must_use]
    pub fn next_station(&self) -> Option<&StationId> {
        self.to_station_id.as_ref().filter(|id| !id.as_str().is_empty())
    }

    /// Previous station of this train's route, if any
    #[must_use]
    pub fn previous_station(&self) -> Option<&StationId> {
        self.from_station_id.as_ref().filter(|id| !id.as_str().is_empty())
    }

    #[must_use]
    pub fn track_index(&self) -> u32 {
        self.track.unwrap_or(0)
    }

    /// Label for the station axis, falling back to the station id
    #[must_use]
    pub fn display_name(&self) -> String {
        self.station_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.station_point_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_decodes_legacy_row_shape() {
        let json = r#"{
            "trainNoLocal": "14103",
            "pointId": "124",
            "nameForPerson": "Bedzin",
            "fromPostId": "719",
            "toPostId": 3991,
            "scheduledArrivalObject": "2024-05-01T10:15:00",
            "scheduledDepartureObject": "2024-05-01T10:16:00",
            "stopTypeNumber": 1,
            "track": 2,
            "platform": "II",
            "mileage": 12.4,
            "line": 133,
            "trainType": "RPJ"
        }"#;
        let stop: Stop = serde_json::from_str(json).expect("should parse");

        assert_eq!(stop.train_number, "14103");
        assert_eq!(stop.station_point_id.as_str(), "124");
        assert_eq!(stop.previous_station().map(StationId::as_str), Some("719"));
        assert_eq!(stop.next_station().map(StationId::as_str), Some("3991"));
        assert_eq!(stop.stop_type, StopType::RequiredStop);
        assert_eq!(stop.track_index(), 2);
        assert_eq!(stop.line.as_deref(), Some("133"));
        assert_eq!(stop.mileage_km, Some(12.4));
        assert_eq!(stop.display_name(), "Bedzin");
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(10, 15, 0))
            .expect("valid time");
        assert_eq!(stop.scheduled_arrival, expected);
    }

    #[test]
    fn test_missing_times_decode_to_sentinels() {
        let json = r#"{
            "trainNumber": "4422",
            "stationPointId": "124",
            "scheduledArrival": null
        }"#;
        let stop: Stop = serde_json::from_str(json).expect("should parse");
        assert_eq!(stop.scheduled_arrival, ROUTE_START);
        assert_eq!(stop.scheduled_departure, ROUTE_END);
        assert_eq!(stop.stop_type, StopType::Pass);
        assert_eq!(stop.track_index(), 0);
        assert!(stop.next_station().is_none());
    }

    #[test]
    fn test_unknown_stop_type_is_rejected() {
        let json = r#"{"trainNumber": "1", "stationPointId": "1", "stopType": 7}"#;
        assert!(serde_json::from_str::<Stop>(json).is_err());
    }

    #[test]
    fn test_empty_link_is_treated_as_absent() {
        let stop = Stop::new("1", "124").with_links(Some(""), Some("719"));
        assert!(stop.previous_station().is_none());
        assert!(stop.next_station().is_some());
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        assert_eq!(Stop::new("1", "124").display_name(), "124");
    }

    #[test]
    fn test_stop_type_codes() {
        assert_eq!(StopType::try_from(2u8), Ok(StopType::OptionalStop));
        assert_eq!(u8::from(StopType::RequiredStop), 1);
        assert!(StopType::OptionalStop.is_stop());
        assert!(!StopType::Pass.is_stop());
    }
}
