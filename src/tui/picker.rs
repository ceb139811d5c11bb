use chrono::{Duration, NaiveDate, Weekday};
use ratatui::layout::{Position, Rect, Size};
use serde::Serialize;

use crate::model::{ActiveField, DateValue, PickerConfig, RecurrenceChoice, Selection, SelectionRange};
use crate::ops::{self, PlacementInsets, first_of_month};

use super::theme::Theme;
use super::time_dialog::TimeDialog;

/// Which picker view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Quick,
    Recurring,
}

/// Where keyboard focus sits inside the quick view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Presets,
    Calendar,
    Fields,
}

/// The values handed back on an explicit save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedRange {
    pub start: Option<DateValue>,
    pub due: Option<DateValue>,
    pub recurrence: Option<RecurrenceChoice>,
}

/// What the picker returns to the host when it is done. Produced exactly
/// once; intermediate drags and picks stay internal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResponse {
    Saved(SavedRange),
    Closed,
}

/// Total popup width in cells (quick view: preset list beside the grid)
pub const PICKER_WIDTH: u16 = 49;

const TAB_ROWS: u16 = 1;
/// Month header + weekday row + six weeks
pub const BODY_ROWS: u16 = 8;
/// Start row, due row, save row
pub const FIELD_ROWS: u16 = 3;
const HINT_ROWS: u16 = 1;

/// Frequencies the recurring view cycles through
pub const FREQUENCIES: [&str; 4] = ["daily", "weekly", "monthly", "yearly"];

/// Editable rows of the recurring view
pub const RECURRING_ROWS: usize = 3;

/// The picker widget state. Lives for one open-to-close session; the
/// host drops it after a [`PickerResponse`] is returned.
pub struct Picker {
    pub selection: Selection,
    pub view: View,
    pub focus: Focus,
    /// First day of the displayed month
    pub month: NaiveDate,
    /// Fixed at open; presets and the today marker both use it
    pub now: NaiveDate,
    pub trigger: Option<Rect>,
    pub theme: Theme,
    pub week_start: Weekday,
    /// Minute spacing of the time dialog list
    pub time_step: u32,
    pub insets: PlacementInsets,
    /// Date under the keyboard cursor in the calendar
    pub cursor_date: NaiveDate,
    pub preset_cursor: usize,
    pub recurring_cursor: usize,
    pub recurrence_enabled: bool,
    pub recurrence_draft: RecurrenceChoice,
    pub time_dialog: Option<TimeDialog>,
    /// One-line feedback shown in place of the hint row
    pub status: Option<String>,
    /// Cell the pointer last reported during a drag, to turn pointer
    /// movement into cell-entry events
    pub last_drag_cell: Option<NaiveDate>,

    // --- Hit-test rects recorded during render ---
    pub popup_rect: Option<Rect>,
    pub calendar_rect: Option<Rect>,
    pub cell_rects: Vec<(Rect, NaiveDate)>,
    pub preset_rects: Vec<(Rect, usize)>,
    pub tab_rects: Vec<(Rect, View)>,
    pub field_rects: Vec<(Rect, ActiveField)>,
    /// Time chips inside the field rows; clicking one opens the dialog
    pub time_rects: Vec<(Rect, ActiveField)>,
    pub clear_rects: Vec<(Rect, ActiveField)>,
    /// Month arrows: the shift to apply when clicked
    pub month_nav_rects: Vec<(Rect, i32)>,
    pub save_rect: Option<Rect>,
    pub time_dialog_rect: Option<Rect>,
    /// Visible time-dialog entries by entry index
    pub time_entry_rects: Vec<(Rect, usize)>,
}

impl Picker {
    /// Open over existing values. Malformed date strings degrade to
    /// absent. `now` is resolved once by the caller and stays fixed for
    /// the session.
    pub fn open(
        start: Option<&str>,
        due: Option<&str>,
        recurrence: Option<RecurrenceChoice>,
        trigger: Option<Rect>,
        config: &PickerConfig,
        now: NaiveDate,
    ) -> Picker {
        let selection = Selection::new(SelectionRange::seed(start, due));
        let cursor_date = selection.range.start.map(|v| v.date()).unwrap_or(now);

        // Malformed stored values degrade to empty fields; say so once
        let dropped_start = start.is_some() && selection.range.start.is_none();
        let dropped_due = due.is_some() && selection.range.due.is_none();
        let status = (dropped_start || dropped_due)
            .then(|| "ignored an unreadable stored date".to_string());

        Picker {
            month: first_of_month(cursor_date),
            cursor_date,
            now,
            selection,
            view: View::Quick,
            focus: Focus::Calendar,
            trigger,
            theme: Theme::from_config(&config.colors),
            week_start: config.week_start_day(),
            time_step: config.time_step,
            insets: PlacementInsets::from(&config.placement),
            preset_cursor: 0,
            recurring_cursor: 0,
            recurrence_enabled: recurrence.is_some(),
            recurrence_draft: recurrence.unwrap_or_default(),
            time_dialog: None,
            status,
            last_drag_cell: None,
            popup_rect: None,
            calendar_rect: None,
            cell_rects: Vec::new(),
            preset_rects: Vec::new(),
            tab_rects: Vec::new(),
            field_rects: Vec::new(),
            time_rects: Vec::new(),
            clear_rects: Vec::new(),
            month_nav_rects: Vec::new(),
            save_rect: None,
            time_dialog_rect: None,
            time_entry_rects: Vec::new(),
        }
    }

    /// Forget the hit rects from the previous frame. Called at the top
    /// of every render pass before new rects are recorded.
    pub fn clear_hit_rects(&mut self) {
        self.popup_rect = None;
        self.calendar_rect = None;
        self.cell_rects.clear();
        self.preset_rects.clear();
        self.tab_rects.clear();
        self.field_rects.clear();
        self.time_rects.clear();
        self.clear_rects.clear();
        self.month_nav_rects.clear();
        self.save_rect = None;
        self.time_dialog_rect = None;
        self.time_entry_rects.clear();
    }

    pub fn field_value(&self, field: ActiveField) -> Option<DateValue> {
        match field {
            ActiveField::Start => self.selection.range.start,
            ActiveField::Due => self.selection.range.due,
        }
    }

    /// Open the time dialog over `field`, seeded with that field's current
    /// time of day. Also makes the field active so the chosen time lands
    /// where the user is looking.
    pub fn open_time_dialog(&mut self, field: ActiveField) {
        let current = self.field_value(field).and_then(|v| v.time());
        let anchor = self.field_anchor(field);
        self.selection.active = field;
        self.time_dialog = Some(TimeDialog::open(field, current, self.time_step, anchor));
    }

    /// Rows the recurring view needs: the fixed rows plus one per
    /// passthrough option
    pub fn recurrence_rows(&self) -> u16 {
        RECURRING_ROWS as u16 + self.recurrence_draft.options.len() as u16
    }

    /// The popup's own size for the current view. Placement is computed
    /// from this before painting, so switching views re-positions.
    pub fn size(&self) -> Size {
        let body = match self.view {
            View::Quick => BODY_ROWS,
            View::Recurring => self.recurrence_rows(),
        };
        let height = 2 + TAB_ROWS + body + 1 + FIELD_ROWS + HINT_ROWS;
        Size::new(PICKER_WIDTH, height)
    }

    /// Step the displayed month by `delta` months. The keyboard cursor
    /// follows into the new month if it would fall outside it.
    pub fn shift_month(&mut self, delta: i32) {
        self.month = ops::shift_month(self.month, delta);
        if first_of_month(self.cursor_date) != self.month {
            self.cursor_date = self.month;
        }
    }

    /// Move the calendar cursor by days; the displayed month follows
    pub fn move_cursor(&mut self, days: i64) {
        self.cursor_date += Duration::days(days);
        if first_of_month(self.cursor_date) != self.month {
            self.month = first_of_month(self.cursor_date);
        }
    }

    pub fn save(&mut self) -> PickerResponse {
        ops::release(&mut self.selection);
        PickerResponse::Saved(SavedRange {
            start: self.selection.range.start,
            due: self.selection.range.due,
            recurrence: self
                .recurrence_enabled
                .then(|| self.recurrence_draft.clone()),
        })
    }

    /// Dismiss without committing. A drag in progress is exited first.
    pub fn close(&mut self) -> PickerResponse {
        ops::release(&mut self.selection);
        PickerResponse::Closed
    }

    // --- Hit testing against the last rendered frame ---

    pub fn hit_popup(&self, pos: Position) -> bool {
        self.popup_rect.is_some_and(|r| r.contains(pos))
    }

    pub fn hit_calendar(&self, pos: Position) -> bool {
        self.calendar_rect.is_some_and(|r| r.contains(pos))
    }

    pub fn cell_at(&self, pos: Position) -> Option<NaiveDate> {
        self.cell_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, d)| *d)
    }

    pub fn preset_at(&self, pos: Position) -> Option<usize> {
        self.preset_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, i)| *i)
    }

    pub fn tab_at(&self, pos: Position) -> Option<View> {
        self.tab_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, v)| *v)
    }

    pub fn field_at(&self, pos: Position) -> Option<ActiveField> {
        self.field_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, f)| *f)
    }

    pub fn time_at(&self, pos: Position) -> Option<ActiveField> {
        self.time_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, f)| *f)
    }

    pub fn clear_at(&self, pos: Position) -> Option<ActiveField> {
        self.clear_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, f)| *f)
    }

    pub fn month_nav_at(&self, pos: Position) -> Option<i32> {
        self.month_nav_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, d)| *d)
    }

    pub fn hit_save(&self, pos: Position) -> bool {
        self.save_rect.is_some_and(|r| r.contains(pos))
    }

    pub fn time_entry_at(&self, pos: Position) -> Option<usize> {
        self.time_entry_rects
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, i)| *i)
    }

    /// The rect the time dialog anchors to: the active field's chip from
    /// the last render, or the popup itself before any render
    pub fn field_anchor(&self, field: ActiveField) -> Rect {
        self.field_rects
            .iter()
            .find(|(_, f)| *f == field)
            .map(|(r, _)| *r)
            .or(self.popup_rect)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open(start: Option<&str>, due: Option<&str>) -> Picker {
        Picker::open(
            start,
            due,
            None,
            Some(Rect::new(10, 2, 12, 1)),
            &PickerConfig::default(),
            date(2026, 8, 25),
        )
    }

    #[test]
    fn test_open_seeds_month_from_start() {
        let picker = open(Some("2024-01-10T14:30:00"), None);
        assert_eq!(picker.month, date(2024, 1, 1));
        assert_eq!(picker.cursor_date, date(2024, 1, 10));
    }

    #[test]
    fn test_open_without_values_shows_current_month() {
        let picker = open(None, None);
        assert_eq!(picker.month, date(2026, 8, 1));
        assert_eq!(picker.cursor_date, date(2026, 8, 25));
        assert_eq!(picker.selection.active, ActiveField::Start);
    }

    #[test]
    fn test_open_degrades_malformed_seed() {
        let picker = open(Some("garbage"), Some("2024-02-05"));
        assert_eq!(picker.selection.range.start, None);
        assert_eq!(
            picker.selection.range.due,
            Some("2024-02-05".parse().unwrap())
        );
        // Degradation surfaces on the status line, never as an error
        assert!(picker.status.is_some());
        assert!(open(Some("2024-01-10"), None).status.is_none());
    }

    #[test]
    fn test_open_time_dialog_seeds_current_time() {
        let mut picker = open(Some("2024-01-10T14:30:00"), None);
        picker.open_time_dialog(ActiveField::Start);
        let dialog = picker.time_dialog.as_ref().unwrap();
        assert_eq!(dialog.selected(), Some("2:30 pm"));
        assert_eq!(picker.selection.active, ActiveField::Start);
    }

    #[test]
    fn test_view_changes_size() {
        let mut picker = open(None, None);
        let quick = picker.size();
        picker.view = View::Recurring;
        let recurring = picker.size();
        assert_eq!(quick.width, recurring.width);
        assert_ne!(quick.height, recurring.height);
    }

    #[test]
    fn test_recurring_options_grow_height() {
        let mut recurrence = RecurrenceChoice::default();
        recurrence
            .options
            .insert("byday".to_string(), "MO,WE".to_string());
        let mut picker = Picker::open(
            None,
            None,
            Some(recurrence),
            None,
            &PickerConfig::default(),
            date(2026, 8, 25),
        );
        picker.view = View::Recurring;
        let with_option = picker.size().height;
        picker.recurrence_draft.options.clear();
        assert_eq!(picker.size().height + 1, with_option);
    }

    #[test]
    fn test_cursor_moves_drag_month_along() {
        let mut picker = open(None, None);
        // Aug 25 + 7 days crosses into September
        picker.move_cursor(7);
        assert_eq!(picker.cursor_date, date(2026, 9, 1));
        assert_eq!(picker.month, date(2026, 9, 1));
    }

    #[test]
    fn test_shift_month_pulls_cursor_in() {
        let mut picker = open(None, None);
        picker.shift_month(1);
        assert_eq!(picker.month, date(2026, 9, 1));
        assert_eq!(picker.cursor_date, date(2026, 9, 1));
        picker.shift_month(-2);
        assert_eq!(picker.month, date(2026, 7, 1));
    }

    #[test]
    fn test_save_carries_recurrence_only_when_enabled() {
        let mut picker = open(Some("2024-01-10"), Some("2024-01-15"));
        assert!(!picker.recurrence_enabled);
        let PickerResponse::Saved(saved) = picker.save() else {
            panic!("expected save");
        };
        assert_eq!(saved.start, Some("2024-01-10".parse().unwrap()));
        assert_eq!(saved.recurrence, None);

        picker.recurrence_enabled = true;
        let PickerResponse::Saved(saved) = picker.save() else {
            panic!("expected save");
        };
        assert_eq!(saved.recurrence, Some(RecurrenceChoice::default()));
    }

    #[test]
    fn test_close_exits_drag() {
        let mut picker = open(None, None);
        crate::ops::press(&mut picker.selection, date(2026, 8, 10));
        assert!(picker.selection.drag.is_dragging());
        let response = picker.close();
        assert_eq!(response, PickerResponse::Closed);
        assert!(!picker.selection.drag.is_dragging());
    }
}
