pub mod category;
pub mod geometry;
pub mod pattern;
pub mod scene;
pub mod settings;

pub use category::*;
pub use geometry::*;
pub use pattern::*;
pub use scene::*;
pub use settings::*;
