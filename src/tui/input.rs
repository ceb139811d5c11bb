use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::model::ActiveField;
use crate::ops::{self, QUICK_PRESETS};

use super::picker::{FREQUENCIES, Focus, Picker, PickerResponse, RECURRING_ROWS, View};
use super::time_dialog::parse_twelve_hour;

/// Handle a key event. Returns `Some` when the session is over: the host
/// tears the picker down and acts on the response.
pub fn handle_key(picker: &mut Picker, key: KeyEvent) -> Option<PickerResponse> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return None;
    }
    picker.status = None;

    // The time dialog intercepts all input while open
    if picker.time_dialog.is_some() {
        handle_time_dialog_key(picker, key);
        return None;
    }

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => return Some(picker.close()),
        (KeyModifiers::NONE, KeyCode::Char('s')) => return Some(picker.save()),
        (KeyModifiers::NONE, KeyCode::Char('r')) => {
            toggle_view(picker);
            return None;
        }
        (_, KeyCode::Tab) => {
            if picker.view == View::Quick {
                picker.focus = next_focus(picker.focus);
            }
            return None;
        }
        (_, KeyCode::BackTab) => {
            if picker.view == View::Quick {
                picker.focus = prev_focus(picker.focus);
            }
            return None;
        }
        _ => {}
    }

    match picker.view {
        View::Quick => handle_quick_key(picker, key),
        View::Recurring => handle_recurring_key(picker, key),
    }
    None
}

/// Handle a mouse event against the hit rects recorded by the last
/// render. Same return contract as [`handle_key`].
pub fn handle_mouse(picker: &mut Picker, mouse: MouseEvent) -> Option<PickerResponse> {
    let pos = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => handle_mouse_down(picker, pos),
        MouseEventKind::Drag(MouseButton::Left) => {
            handle_mouse_drag(picker, pos);
            None
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if picker.selection.drag.is_dragging() {
                ops::release(&mut picker.selection);
            }
            picker.last_drag_cell = None;
            None
        }
        MouseEventKind::ScrollUp => {
            handle_scroll(picker, pos, -1);
            None
        }
        MouseEventKind::ScrollDown => {
            handle_scroll(picker, pos, 1);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Quick view keys
// ---------------------------------------------------------------------------

fn handle_quick_key(picker: &mut Picker, key: KeyEvent) {
    match picker.focus {
        Focus::Presets => handle_preset_key(picker, key),
        Focus::Calendar => handle_calendar_key(picker, key),
        Focus::Fields => handle_field_key(picker, key),
    }
}

fn handle_calendar_key(picker: &mut Picker, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('h')) | (_, KeyCode::Left) => {
            move_calendar_cursor(picker, -1);
        }
        (KeyModifiers::NONE, KeyCode::Char('l')) | (_, KeyCode::Right) => {
            move_calendar_cursor(picker, 1);
        }
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            move_calendar_cursor(picker, -7);
        }
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            move_calendar_cursor(picker, 7);
        }
        (KeyModifiers::NONE, KeyCode::Char('[')) | (_, KeyCode::PageUp) => {
            shift_month_keep_drag(picker, -1);
        }
        (KeyModifiers::NONE, KeyCode::Char(']')) | (_, KeyCode::PageDown) => {
            shift_month_keep_drag(picker, 1);
        }
        (KeyModifiers::NONE, KeyCode::Char('g')) | (_, KeyCode::Home) => {
            picker.cursor_date = picker.now;
            picker.month = ops::first_of_month(picker.now);
            if picker.selection.drag.is_dragging() {
                ops::drag_to(&mut picker.selection, picker.cursor_date);
            }
        }
        // v starts a keyboard drag at the cursor; v again (or Enter)
        // releases it, keeping the live range
        (KeyModifiers::NONE, KeyCode::Char('v')) => {
            if picker.selection.drag.is_dragging() {
                ops::release(&mut picker.selection);
            } else {
                ops::press(&mut picker.selection, picker.cursor_date);
            }
        }
        (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
            if picker.selection.drag.is_dragging() {
                ops::release(&mut picker.selection);
            } else {
                // A click is a press and release on the same cell
                ops::press(&mut picker.selection, picker.cursor_date);
                ops::release(&mut picker.selection);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('t')) => {
            picker.open_time_dialog(picker.selection.active);
        }
        (KeyModifiers::NONE, KeyCode::Char('x'))
        | (_, KeyCode::Backspace)
        | (_, KeyCode::Delete) => {
            let field = picker.selection.active;
            ops::clear(&mut picker.selection, field);
        }
        _ => {}
    }
}

fn handle_preset_key(picker: &mut Picker, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            picker.preset_cursor = picker.preset_cursor.saturating_sub(1);
        }
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            picker.preset_cursor = (picker.preset_cursor + 1).min(QUICK_PRESETS.len() - 1);
        }
        (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
            apply_preset(picker, picker.preset_cursor);
        }
        _ => {}
    }
}

fn handle_field_key(picker: &mut Picker, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Char('k'))
        | (_, KeyCode::Up | KeyCode::Down) => {
            picker.selection.active = match picker.selection.active {
                ActiveField::Start => ActiveField::Due,
                ActiveField::Due => ActiveField::Start,
            };
        }
        (KeyModifiers::NONE, KeyCode::Char('t') | KeyCode::Char(' ')) | (_, KeyCode::Enter) => {
            picker.open_time_dialog(picker.selection.active);
        }
        (KeyModifiers::NONE, KeyCode::Char('x'))
        | (_, KeyCode::Backspace)
        | (_, KeyCode::Delete) => {
            let field = picker.selection.active;
            ops::clear(&mut picker.selection, field);
        }
        _ => {}
    }
}

fn move_calendar_cursor(picker: &mut Picker, days: i64) {
    picker.move_cursor(days);
    if picker.selection.drag.is_dragging() {
        ops::drag_to(&mut picker.selection, picker.cursor_date);
    }
}

fn shift_month_keep_drag(picker: &mut Picker, delta: i32) {
    picker.shift_month(delta);
    if picker.selection.drag.is_dragging() {
        ops::drag_to(&mut picker.selection, picker.cursor_date);
    }
}

fn apply_preset(picker: &mut Picker, index: usize) {
    let Some(preset) = QUICK_PRESETS.get(index) else {
        return;
    };
    let date = preset.resolve(picker.now, picker.week_start);
    ops::quick_pick(&mut picker.selection, date);
    picker.cursor_date = date;
    picker.month = ops::first_of_month(date);
}

// ---------------------------------------------------------------------------
// Recurring view keys
// ---------------------------------------------------------------------------

fn handle_recurring_key(picker: &mut Picker, key: KeyEvent) {
    let rows = RECURRING_ROWS + picker.recurrence_draft.options.len();
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            picker.recurring_cursor = picker.recurring_cursor.saturating_sub(1);
        }
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            picker.recurring_cursor = (picker.recurring_cursor + 1).min(rows - 1);
        }
        (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
            match picker.recurring_cursor {
                0 => picker.recurrence_enabled = !picker.recurrence_enabled,
                1 => cycle_frequency(picker, 1),
                2 => adjust_interval(picker, 1),
                // Passthrough options are carried opaquely, not edited
                _ => {}
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('h')) | (_, KeyCode::Left) => {
            match picker.recurring_cursor {
                1 => cycle_frequency(picker, -1),
                2 => adjust_interval(picker, -1),
                _ => {}
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('l')) | (_, KeyCode::Right) => {
            match picker.recurring_cursor {
                1 => cycle_frequency(picker, 1),
                2 => adjust_interval(picker, 1),
                _ => {}
            }
        }
        _ => {}
    }
}

fn cycle_frequency(picker: &mut Picker, step: i32) {
    let current = picker.recurrence_draft.frequency.as_str();
    // Unknown passthrough frequencies re-enter the cycle at "weekly"
    let idx = FREQUENCIES.iter().position(|f| *f == current).unwrap_or(1) as i32;
    let next = (idx + step).rem_euclid(FREQUENCIES.len() as i32) as usize;
    picker.recurrence_draft.frequency = FREQUENCIES[next].to_string();
}

fn adjust_interval(picker: &mut Picker, step: i32) {
    let interval = picker.recurrence_draft.interval as i32 + step;
    picker.recurrence_draft.interval = interval.clamp(1, 99) as u32;
}

// ---------------------------------------------------------------------------
// Time dialog keys
// ---------------------------------------------------------------------------

fn handle_time_dialog_key(picker: &mut Picker, key: KeyEvent) {
    let Some(dialog) = &mut picker.time_dialog else {
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            picker.time_dialog = None;
        }
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => dialog.move_cursor(-1),
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => dialog.move_cursor(1),
        (_, KeyCode::PageUp) => dialog.move_cursor(-8),
        (_, KeyCode::PageDown) => dialog.move_cursor(8),
        (KeyModifiers::NONE, KeyCode::Enter) | (KeyModifiers::NONE, KeyCode::Char(' ')) => {
            let index = dialog.cursor;
            commit_time_entry(picker, index);
        }
        _ => {}
    }
}

/// Take the dialog's entry at `index` and merge its time into the
/// dialog's field. The dialog hands back a 12-hour string; parsing it is
/// the picker's job.
fn commit_time_entry(picker: &mut Picker, index: usize) {
    let Some(dialog) = picker.time_dialog.take() else {
        return;
    };
    let Some(label) = dialog.entries.get(index) else {
        return;
    };
    match parse_twelve_hour(label) {
        Some((hour, minute)) => {
            ops::set_time(&mut picker.selection, dialog.field, hour, minute);
        }
        // Entries are well formed by construction; this is the fail-soft
        // path for a hand-fed string
        None => picker.status = Some(format!("could not read time \"{}\"", label)),
    }
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

fn handle_mouse_down(picker: &mut Picker, pos: Position) -> Option<PickerResponse> {
    picker.status = None;

    if picker.time_dialog.is_some() {
        if let Some(index) = picker.time_entry_at(pos) {
            commit_time_entry(picker, index);
        } else if !picker.time_dialog_rect.is_some_and(|r| r.contains(pos)) {
            // Clicking away cancels the dialog but not the picker
            picker.time_dialog = None;
        }
        return None;
    }

    // Clicking outside the popup dismisses without committing
    if !picker.hit_popup(pos) {
        return Some(picker.close());
    }

    if let Some(view) = picker.tab_at(pos) {
        if view != picker.view {
            toggle_view(picker);
        }
        return None;
    }
    if let Some(delta) = picker.month_nav_at(pos) {
        shift_month_keep_drag(picker, delta);
        return None;
    }
    if let Some(index) = picker.preset_at(pos) {
        picker.focus = Focus::Presets;
        picker.preset_cursor = index;
        apply_preset(picker, index);
        return None;
    }
    if let Some(date) = picker.cell_at(pos) {
        picker.focus = Focus::Calendar;
        picker.cursor_date = date;
        ops::press(&mut picker.selection, date);
        picker.last_drag_cell = Some(date);
        return None;
    }
    if let Some(field) = picker.clear_at(pos) {
        ops::clear(&mut picker.selection, field);
        return None;
    }
    if let Some(field) = picker.time_at(pos) {
        picker.focus = Focus::Fields;
        picker.open_time_dialog(field);
        return None;
    }
    if let Some(field) = picker.field_at(pos) {
        picker.focus = Focus::Fields;
        picker.selection.active = field;
        return None;
    }
    if picker.hit_save(pos) {
        return Some(picker.save());
    }
    None
}

fn handle_mouse_drag(picker: &mut Picker, pos: Position) {
    if picker.time_dialog.is_some() || !picker.selection.drag.is_dragging() {
        return;
    }
    if let Some(date) = picker.cell_at(pos) {
        // Only a change of cell is a transition
        if picker.last_drag_cell != Some(date) {
            ops::drag_to(&mut picker.selection, date);
            picker.cursor_date = date;
            picker.last_drag_cell = Some(date);
        }
    } else if !picker.hit_calendar(pos) {
        // The pointer left the grid entirely: end the gesture so the
        // picker can never stay stuck mid-drag
        ops::release(&mut picker.selection);
        picker.last_drag_cell = None;
    }
}

fn handle_scroll(picker: &mut Picker, pos: Position, step: i32) {
    if let Some(dialog) = &mut picker.time_dialog {
        if picker.time_dialog_rect.is_some_and(|r| r.contains(pos)) {
            dialog.move_cursor(step);
        }
        return;
    }
    // Scrolling over the quick view pages the calendar month; a drag in
    // progress stays pinned to its cells
    if picker.view == View::Quick
        && picker.hit_popup(pos)
        && !picker.selection.drag.is_dragging()
    {
        picker.shift_month(step);
    }
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn toggle_view(picker: &mut Picker) {
    // The grid disappears on a view switch, so an open gesture ends here
    if picker.selection.drag.is_dragging() {
        ops::release(&mut picker.selection);
    }
    picker.view = match picker.view {
        View::Quick => View::Recurring,
        View::Recurring => View::Quick,
    };
}

fn next_focus(focus: Focus) -> Focus {
    match focus {
        Focus::Presets => Focus::Calendar,
        Focus::Calendar => Focus::Fields,
        Focus::Fields => Focus::Presets,
    }
}

fn prev_focus(focus: Focus) -> Focus {
    match focus {
        Focus::Presets => Focus::Fields,
        Focus::Calendar => Focus::Presets,
        Focus::Fields => Focus::Calendar,
    }
}
