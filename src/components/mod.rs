#![allow(clippy::needless_pass_by_value)]

pub mod train_graph;

pub use train_graph::{use_stored_train_graph, use_train_graph, TrainGraphHandle};
