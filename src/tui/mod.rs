pub mod input;
pub mod picker;
pub mod render;
pub mod theme;
pub mod time_dialog;

pub use picker::{Picker, PickerResponse, SavedRange};
