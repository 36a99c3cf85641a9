//! Pattern cascade flow: lays out a day's behavioral patterns by cascade depth,
//! renders them as a flow diagram and tracks the pan/zoom viewport.

pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{FlowError, Result};
pub use services::flow_model::FlowModel;
pub use services::layout_engine::{assign_columns, compute_layout, PositionMap};
