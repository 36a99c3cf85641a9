pub mod flow_model;
pub mod flow_renderer;
pub mod layout_engine;
pub mod snapshot_watcher;
pub mod svg;
pub mod viewport;
