mod http;
mod memory;

pub use http::HttpTimetableSource;
pub use memory::InMemoryTimetableSource;

use crate::models::{StationId, Stop};

/// Port through which the diagram engine reads timetables
///
/// Implementations report failures as messages; the engine treats a failed or
/// empty station fetch as the end of the chain in that direction.
#[allow(async_fn_in_trait)]
pub trait TimetableSource {
    /// All rows of one station in the given server snapshot
    async fn station_timetable(&self, station: &StationId, snapshot_id: &str) -> Result<Vec<Stop>, String>;

    /// The complete route of one train, used for mileage lookups
    async fn train_timetable(&self, train_number: &str, snapshot_id: &str) -> Result<Vec<Stop>, String>;
}
