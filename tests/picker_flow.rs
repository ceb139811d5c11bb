//! End-to-end picker sessions: render into a test backend, feed key and
//! mouse events against the recorded hit rects, and check what comes out.

use chrono::NaiveDate;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use pretty_assertions::assert_eq;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use datespan::model::{ActiveField, PickerConfig, Selection, SelectionRange};
use datespan::ops;
use datespan::tui::input::{handle_key, handle_mouse};
use datespan::tui::render::render_picker;
use datespan::tui::{Picker, PickerResponse};

const TRIGGER: Rect = Rect::new(10, 2, 36, 1);

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open(start: Option<&str>, due: Option<&str>) -> Picker {
    Picker::open(
        start,
        due,
        None,
        Some(TRIGGER),
        &PickerConfig::default(),
        date(2026, 8, 25),
    )
}

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(80, 24)).unwrap()
}

fn draw(terminal: &mut Terminal<TestBackend>, picker: &mut Picker) {
    terminal
        .draw(|frame| render_picker(frame, picker))
        .unwrap();
}

fn key(picker: &mut Picker, code: KeyCode) -> Option<PickerResponse> {
    handle_key(picker, KeyEvent::new(code, KeyModifiers::NONE))
}

fn mouse(
    picker: &mut Picker,
    kind: MouseEventKind,
    (column, row): (u16, u16),
) -> Option<PickerResponse> {
    handle_mouse(
        picker,
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        },
    )
}

fn press(picker: &mut Picker, pos: (u16, u16)) -> Option<PickerResponse> {
    mouse(picker, MouseEventKind::Down(MouseButton::Left), pos)
}

fn drag(picker: &mut Picker, pos: (u16, u16)) {
    mouse(picker, MouseEventKind::Drag(MouseButton::Left), pos);
}

fn release(picker: &mut Picker, pos: (u16, u16)) {
    mouse(picker, MouseEventKind::Up(MouseButton::Left), pos);
}

fn click(picker: &mut Picker, pos: (u16, u16)) -> Option<PickerResponse> {
    let response = press(picker, pos);
    release(picker, pos);
    response
}

/// Center of the rendered cell for `date`; panics if the date is not on
/// the visible grid.
fn cell_pos(picker: &Picker, date: NaiveDate) -> (u16, u16) {
    let (rect, _) = picker
        .cell_rects
        .iter()
        .find(|(_, d)| *d == date)
        .copied()
        .expect("date not on the rendered grid");
    (rect.x + 1, rect.y)
}

fn rect_pos(rect: Rect) -> (u16, u16) {
    (rect.x + rect.width / 2, rect.y)
}

#[test]
fn test_mouse_drag_matches_state_machine() {
    let mut terminal = terminal();
    let mut picker = open(None, None);
    draw(&mut terminal, &mut picker);

    let day10 = cell_pos(&picker, date(2026, 8, 10));
    let day12 = cell_pos(&picker, date(2026, 8, 12));
    let day14 = cell_pos(&picker, date(2026, 8, 14));
    press(&mut picker, day10);
    drag(&mut picker, day12);
    drag(&mut picker, day14);
    release(&mut picker, day14);

    // The same gesture against the bare selection ops
    let mut sel = Selection::new(SelectionRange::seed(None, None));
    ops::press(&mut sel, date(2026, 8, 10));
    ops::drag_to(&mut sel, date(2026, 8, 12));
    ops::drag_to(&mut sel, date(2026, 8, 14));
    ops::release(&mut sel);

    assert_eq!(picker.selection.range, sel.range);
    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-10".parse().unwrap())
    );
    assert_eq!(
        picker.selection.range.due,
        Some("2026-08-14".parse().unwrap())
    );
    assert!(!picker.selection.drag.is_dragging());
}

#[test]
fn test_backward_drag_lands_sorted() {
    let mut terminal = terminal();
    let mut picker = open(None, None);
    draw(&mut terminal, &mut picker);

    let day14 = cell_pos(&picker, date(2026, 8, 14));
    let day10 = cell_pos(&picker, date(2026, 8, 10));
    press(&mut picker, day14);
    drag(&mut picker, day10);
    release(&mut picker, day10);

    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-10".parse().unwrap())
    );
    assert_eq!(
        picker.selection.range.due,
        Some("2026-08-14".parse().unwrap())
    );
}

#[test]
fn test_click_two_days_then_save() {
    let mut terminal = terminal();
    let mut picker = open(None, None);

    draw(&mut terminal, &mut picker);
    let day10 = cell_pos(&picker, date(2026, 8, 10));
    click(&mut picker, day10);
    draw(&mut terminal, &mut picker);
    let day14 = cell_pos(&picker, date(2026, 8, 14));
    click(&mut picker, day14);
    draw(&mut terminal, &mut picker);

    let save = rect_pos(picker.save_rect.unwrap());
    let response = click(&mut picker, save);
    let Some(PickerResponse::Saved(saved)) = response else {
        panic!("expected a save, got {:?}", response);
    };

    let json = serde_json::to_value(&saved).unwrap();
    assert_eq!(json["start"], "2026-08-10");
    assert_eq!(json["due"], "2026-08-14");
    assert_eq!(json["recurrence"], serde_json::Value::Null);
}

#[test]
fn test_preset_then_click_before_start_swaps() {
    let mut terminal = terminal();
    let mut picker = open(None, None);
    draw(&mut terminal, &mut picker);

    // "Next week" from Tue Aug 25 is Tue Sep 1; the grid follows
    let (rect, _) = picker.preset_rects[2];
    click(&mut picker, rect_pos(rect));
    assert_eq!(
        picker.selection.range.start,
        Some("2026-09-01".parse().unwrap())
    );
    assert_eq!(picker.selection.active, ActiveField::Due);
    assert_eq!(picker.month, date(2026, 9, 1));

    // Clicking a day before the start hands it the start role
    draw(&mut terminal, &mut picker);
    let day31 = cell_pos(&picker, date(2026, 8, 31));
    click(&mut picker, day31);
    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-31".parse().unwrap())
    );
    assert_eq!(
        picker.selection.range.due,
        Some("2026-09-01".parse().unwrap())
    );
}

#[test]
fn test_escape_closes_without_saving() {
    let mut terminal = terminal();
    let mut picker = open(Some("2026-08-10"), None);
    draw(&mut terminal, &mut picker);

    let response = key(&mut picker, KeyCode::Esc);
    assert_eq!(response, Some(PickerResponse::Closed));
}

#[test]
fn test_click_outside_popup_closes() {
    let mut terminal = terminal();
    let mut picker = open(None, None);
    draw(&mut terminal, &mut picker);

    // Popup sits below the trigger; the top-left corner is host ground
    assert!(!picker.popup_rect.unwrap().contains((0, 0).into()));
    let response = press(&mut picker, (0, 0));
    assert_eq!(response, Some(PickerResponse::Closed));
}

#[test]
fn test_time_chip_click_merges_and_survives_drag() {
    let mut terminal = terminal();
    let mut picker = open(Some("2026-08-10"), None);
    draw(&mut terminal, &mut picker);

    // Open the time list from the start field's chip
    let (chip, _) = picker
        .time_rects
        .iter()
        .find(|(_, f)| *f == ActiveField::Start)
        .copied()
        .unwrap();
    click(&mut picker, rect_pos(chip));
    assert!(picker.time_dialog.is_some());

    // Pick the highlighted entry (9:00 am for a bare date)
    draw(&mut terminal, &mut picker);
    let cursor = picker.time_dialog.as_ref().unwrap().cursor;
    let (entry, _) = picker
        .time_entry_rects
        .iter()
        .find(|(_, i)| *i == cursor)
        .copied()
        .unwrap();
    click(&mut picker, rect_pos(entry));
    assert!(picker.time_dialog.is_none());
    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-10T09:00:00".parse().unwrap())
    );

    // Aim input back at the due field, then complete the range; the
    // chosen time carries onto the new end
    draw(&mut terminal, &mut picker);
    let (due_field, _) = picker
        .field_rects
        .iter()
        .find(|(_, f)| *f == ActiveField::Due)
        .copied()
        .unwrap();
    click(&mut picker, rect_pos(due_field));
    assert_eq!(picker.selection.active, ActiveField::Due);

    draw(&mut terminal, &mut picker);
    let day12 = cell_pos(&picker, date(2026, 8, 12));
    click(&mut picker, day12);
    assert_eq!(
        picker.selection.range.due,
        Some("2026-08-12T09:00:00".parse().unwrap())
    );
    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-10T09:00:00".parse().unwrap())
    );
}

#[test]
fn test_inline_picker_takes_clicks() {
    let mut terminal = terminal();
    let mut picker = Picker::open(
        None,
        None,
        None,
        None,
        &PickerConfig::default(),
        date(2026, 8, 25),
    );
    draw(&mut terminal, &mut picker);

    let popup = picker.popup_rect.unwrap();
    assert_eq!((popup.x, popup.y), (0, 0));

    let day10 = cell_pos(&picker, date(2026, 8, 10));
    click(&mut picker, day10);
    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-10".parse().unwrap())
    );
}

#[test]
fn test_scroll_wheel_pages_month() {
    let mut terminal = terminal();
    let mut picker = open(None, None);
    draw(&mut terminal, &mut picker);

    let center = rect_pos(picker.popup_rect.unwrap());
    mouse(&mut picker, MouseEventKind::ScrollDown, center);
    assert_eq!(picker.month, date(2026, 9, 1));
    mouse(&mut picker, MouseEventKind::ScrollUp, center);
    mouse(&mut picker, MouseEventKind::ScrollUp, center);
    assert_eq!(picker.month, date(2026, 7, 1));
}

#[test]
fn test_drag_leaving_grid_releases() {
    let mut terminal = terminal();
    let mut picker = open(None, None);
    draw(&mut terminal, &mut picker);

    let day10 = cell_pos(&picker, date(2026, 8, 10));
    let day12 = cell_pos(&picker, date(2026, 8, 12));
    press(&mut picker, day10);
    drag(&mut picker, day12);
    assert!(picker.selection.drag.is_dragging());

    // Dragging onto the preset pane is off-grid: the gesture ends and the
    // live range stays
    let off_grid = rect_pos(picker.preset_rects[0].0);
    drag(&mut picker, off_grid);
    assert!(!picker.selection.drag.is_dragging());
    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-10".parse().unwrap())
    );
    assert_eq!(
        picker.selection.range.due,
        Some("2026-08-12".parse().unwrap())
    );
}

#[test]
fn test_saved_payload_with_recurrence() {
    let mut terminal = terminal();
    let mut picker = open(Some("2026-08-10"), Some("2026-08-14"));
    draw(&mut terminal, &mut picker);

    // Flip to the recurring view and switch repetition on
    key(&mut picker, KeyCode::Char('r'));
    key(&mut picker, KeyCode::Enter);
    let response = key(&mut picker, KeyCode::Char('s'));
    let Some(PickerResponse::Saved(saved)) = response else {
        panic!("expected a save, got {:?}", response);
    };

    let json = serde_json::to_value(&saved).unwrap();
    assert_eq!(json["recurrence"]["frequency"], "weekly");
    assert_eq!(json["recurrence"]["interval"], 1);
}

#[test]
fn test_resize_reanchors_popup() {
    let mut picker = open(None, None);

    let mut tall = terminal();
    draw(&mut tall, &mut picker);
    assert_eq!(picker.popup_rect.unwrap().height, 16);
    assert_eq!(picker.cell_rects.len(), 42);

    // A shorter window clamps the popup; stale rects are replaced
    let mut short = Terminal::new(TestBackend::new(80, 12)).unwrap();
    draw(&mut short, &mut picker);
    assert!(picker.popup_rect.unwrap().height < 16);
    assert!(picker.cell_rects.len() < 42);

    // Interaction keeps working against the new rects
    let day4 = cell_pos(&picker, date(2026, 8, 4));
    click(&mut picker, day4);
    assert_eq!(
        picker.selection.range.start,
        Some("2026-08-04".parse().unwrap())
    );
}
