pub mod date_value;
pub mod selection;
pub mod config;

pub use date_value::*;
pub use selection::*;
pub use config::*;
