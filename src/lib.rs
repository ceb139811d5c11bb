//! A start/due date-range picker engine with a terminal UI widget.
//!
//! The `model` and `ops` modules are the headless core: date values,
//! the selection state machine, calendar grid math, quick presets, and
//! anchored popup placement. The `tui` module embeds the core as a
//! ratatui popup driven by crossterm key and mouse events.

pub mod model;
pub mod ops;
pub mod tui;
