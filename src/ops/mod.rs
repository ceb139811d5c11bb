pub mod grid;
pub mod position;
pub mod presets;
pub mod select;

pub use grid::*;
pub use position::*;
pub use presets::*;
pub use select::*;
