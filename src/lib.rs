#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]
#![allow(clippy::manual_is_multiple_of)]

pub mod logging;
pub mod api;
pub mod components;
pub mod constants;
pub mod diagram;
pub mod geometry;
pub mod models;
pub mod session;
pub mod theme;
pub mod time;
pub mod timetable;

#[cfg(test)]
mod test_support;

pub use diagram::{reconstruct, GraphError, GraphRequest};
pub use models::{GraphData, GraphLine, GraphPoint, GraphPost, GraphSettings, StationId, Stop, StopType};
pub use session::GraphSession;
