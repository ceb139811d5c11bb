use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::date_value::DateValue;

/// Which end of the range input currently targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveField {
    Start,
    Due,
}

/// The working start/due pair. When both ends are set the selection
/// machinery keeps `start <= due` by calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Option<DateValue>,
    pub due: Option<DateValue>,
}

impl SelectionRange {
    /// Build a range from stored strings. Malformed values degrade to absent.
    pub fn seed(start: Option<&str>, due: Option<&str>) -> SelectionRange {
        SelectionRange {
            start: start.and_then(|s| s.parse().ok()),
            due: due.and_then(|s| s.parse().ok()),
        }
    }

    /// Whether `date` falls inside the selected span (endpoints included)
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.due) {
            (Some(s), Some(d)) => s.date() <= date && date <= d.date(),
            _ => false,
        }
    }

    /// Whether `date` is one of the endpoints
    pub fn is_endpoint(&self, date: NaiveDate) -> bool {
        self.start.map(|v| v.date()) == Some(date) || self.due.map(|v| v.date()) == Some(date)
    }
}

/// Times captured when a gesture begins, so re-dragging a range across
/// new dates keeps the previously chosen times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreservedTimes {
    pub start: Option<DateValue>,
    pub due: Option<DateValue>,
}

impl PreservedTimes {
    pub fn capture(range: &SelectionRange) -> PreservedTimes {
        PreservedTimes {
            start: range.start,
            due: range.due,
        }
    }

    /// Time source for the due end: the preserved due, else the preserved
    /// start. A preserved bare due stays bare; the fallback applies only
    /// when no due was set at all.
    pub fn due_source(&self) -> Option<&DateValue> {
        self.due.as_ref().or(self.start.as_ref())
    }
}

/// A press-to-release gesture in progress. The snapshot travels with the
/// session so nothing outside the gesture can mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// The cell where the gesture began
    pub anchor: NaiveDate,
    pub preserved: PreservedTimes,
}

/// Interaction state of the selection machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }
}

/// The full working selection: the range being edited, which field input
/// targets, and the gesture in progress (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub range: SelectionRange,
    pub active: ActiveField,
    pub drag: DragState,
    /// Snapshot taken by the press that restarted the range, kept until
    /// the completing press consumes it. The restart clears the due end,
    /// so completion cannot recover the due time from the range itself.
    pub held_times: Option<PreservedTimes>,
}

impl Selection {
    /// A selection over an existing range. Input initially targets the
    /// start field when none is set, otherwise the due field.
    pub fn new(range: SelectionRange) -> Selection {
        let active = if range.start.is_none() {
            ActiveField::Start
        } else {
            ActiveField::Due
        };
        Selection {
            range,
            active,
            drag: DragState::Idle,
            held_times: None,
        }
    }
}

/// Recurrence parameters edited in the recurring view. Passed through to
/// the caller verbatim on save; nothing here interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceChoice {
    pub frequency: String,
    pub interval: u32,
    /// Extra options in caller-defined order, carried untouched
    #[serde(default)]
    pub options: IndexMap<String, String>,
}

impl Default for RecurrenceChoice {
    fn default() -> Self {
        RecurrenceChoice {
            frequency: "weekly".to_string(),
            interval: 1,
            options: IndexMap::new(),
        }
    }
}
