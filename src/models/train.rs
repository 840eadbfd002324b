use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use super::{StationId, StopType};
use crate::time::{arrival_serde, departure_serde};

/// One point of a server train's route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub point_id: StationId,
    #[serde(default)]
    pub name_for_person: Option<String>,
    #[serde(with = "arrival_serde", default = "crate::time::route_start")]
    pub arrival_time: NaiveDateTime,
    #[serde(with = "departure_serde", default = "crate::time::route_end")]
    pub departure_time: NaiveDateTime,
    #[serde(default)]
    pub stop_type_number: StopType,
    #[serde(default)]
    pub track: Option<u32>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub max_speed: Option<u32>,
    #[serde(default)]
    pub line: Option<serde_json::Value>,
    #[serde(default)]
    pub mileage: Option<f64>,
    #[serde(default)]
    pub train_type: Option<String>,
}

/// A train as published by a server snapshot: its number and full route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTrain {
    #[serde(alias = "trainNoLocal")]
    pub train_number: String,
    #[serde(default, alias = "trainName")]
    pub train_type: String,
    #[serde(default)]
    pub timetable: Vec<Checkpoint>,
}

impl Checkpoint {
    /// Railway line code as text, whatever JSON type it arrived as
    #[must_use]
    pub fn line_code(&self) -> Option<String> {
        match self.line.as_ref()? {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}
