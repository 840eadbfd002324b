use super::TimetableSource;
use crate::models::{StationId, Stop};

/// Timetable source backed by the EDR backend's JSON endpoints
///
/// - `GET {base}/stations/{snapshot}/{station}` → rows of one station
/// - `GET {base}/trains/{snapshot}/{train}` → full route of one train
#[derive(Debug, Clone)]
pub struct HttpTimetableSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTimetableSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn station_url(&self, station: &StationId, snapshot_id: &str) -> String {
        format!("{}/stations/{snapshot_id}/{station}", self.base_url)
    }

    #[must_use]
    pub fn train_url(&self, train_number: &str, snapshot_id: &str) -> String {
        format!("{}/trains/{snapshot_id}/{train_number}", self.base_url)
    }

    async fn fetch_rows(&self, url: &str) -> Result<Vec<Stop>, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("Request to {url} returned {}", response.status()));
        }

        response
            .json::<Vec<Stop>>()
            .await
            .map_err(|e| format!("Failed to deserialize: {e}"))
    }
}

impl TimetableSource for HttpTimetableSource {
    async fn station_timetable(&self, station: &StationId, snapshot_id: &str) -> Result<Vec<Stop>, String> {
        self.fetch_rows(&self.station_url(station, snapshot_id)).await
    }

    async fn train_timetable(&self, train_number: &str, snapshot_id: &str) -> Result<Vec<Stop>, String> {
        self.fetch_rows(&self.train_url(train_number, snapshot_id)).await
    }
}
