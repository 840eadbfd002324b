mod graph;
mod id;
mod settings;
mod stop;
mod train;

pub use graph::{GraphData, GraphLine, GraphPoint, GraphPost};
pub use id::StationId;
pub use settings::GraphSettings;
pub use stop::{Stop, StopType};
pub use train::{Checkpoint, ServerTrain};
