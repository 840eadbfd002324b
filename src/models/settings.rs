use serde::{Deserialize, Serialize};
use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_TARGET_STATIONS, LOOK_AHEAD_MINUTES, LOOK_BACK_MINUTES,
    TRACK_OFFSET_PX, WINDOW_SLACK_MINUTES,
};
use crate::theme::Theme;

#[cfg(target_arch = "wasm32")]
const SETTINGS_STORAGE_KEY: &str = "edr_graph_settings";

/// Deployment and display settings of the train graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Stations to discover around the reference station (5 or 7 in practice)
    pub target_stations: usize,
    pub look_back_minutes: f64,
    pub look_ahead_minutes: f64,
    /// Extra minutes on both window ends when filtering timetable rows
    pub window_slack_minutes: f64,
    pub track_offset_px: f64,
    pub theme: Theme,
    pub api_base: String,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            target_stations: DEFAULT_TARGET_STATIONS,
            look_back_minutes: LOOK_BACK_MINUTES,
            look_ahead_minutes: LOOK_AHEAD_MINUTES,
            window_slack_minutes: WINDOW_SLACK_MINUTES,
            track_offset_px: TRACK_OFFSET_PX,
            theme: Theme::default(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl GraphSettings {
    /// Parse settings from JSON; missing fields keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse settings: {e}"))?;
        Ok(settings.sanitized())
    }

    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize settings: {e}"))
    }

    /// Clamp values that would make the diagram degenerate
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.target_stations = self.target_stations.max(1);
        if self.look_back_minutes.is_nan() || self.look_back_minutes < 0.0 {
            self.look_back_minutes = defaults.look_back_minutes;
        }
        if self.look_ahead_minutes.is_nan() || self.look_ahead_minutes <= 0.0 {
            self.look_ahead_minutes = defaults.look_ahead_minutes;
        }
        if self.window_slack_minutes.is_nan() || self.window_slack_minutes < 0.0 {
            self.window_slack_minutes = defaults.window_slack_minutes;
        }
        if !self.track_offset_px.is_finite() {
            self.track_offset_px = defaults.track_offset_px;
        }
        self
    }

    /// Settings from a stored JSON value; nothing stored means defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is malformed.
    pub fn from_stored(stored: Option<&str>) -> Result<Self, String> {
        stored.map_or_else(|| Ok(Self::default()), Self::from_json)
    }

    /// Load settings from `localStorage`, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unavailable or holds malformed settings.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, String> {
        let stored = local_storage()?
            .get_item(SETTINGS_STORAGE_KEY)
            .map_err(|_| "Failed to read settings")?;
        Self::from_stored(stored.as_deref())
    }

    /// Stored settings, or defaults when there are none or they cannot be read
    #[must_use]
    pub fn load_or_default() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::load().unwrap_or_else(|e| {
                leptos::logging::warn!("Using default graph settings: {}", e);
                Self::default()
            })
        }
        #[cfg(not(target_arch = "wasm32"))]
        Self::default()
    }

    /// Save settings to `localStorage`
    ///
    /// # Errors
    ///
    /// Returns an error if storage is unavailable or the write fails.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), String> {
        let json = self.to_json()?;
        local_storage()?
            .set_item(SETTINGS_STORAGE_KEY, &json)
            .map_err(|_| "Failed to write settings".to_string())
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or("No window")?;
    window
        .local_storage()
        .map_err(|_| "localStorage not supported")?
        .ok_or_else(|| "localStorage not available".to_string())
}
