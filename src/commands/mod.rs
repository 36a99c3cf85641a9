pub mod export;
pub mod flow;
