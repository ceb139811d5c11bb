use chrono::{Datelike, Timelike};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::ActiveField;
use crate::ops::{CalendarCell, QUICK_PRESETS, calendar_cells, compute_placement, weekday_labels};

use super::picker::{BODY_ROWS, Focus, Picker, View};
use super::theme::Theme;
use super::time_dialog::{format_twelve_hour, render_time_dialog};

/// Column layout of the quick body, relative to the popup interior:
/// preset pane, separator, calendar pane.
const PRESET_PANE_W: u16 = 16;
const CALENDAR_PANE_X: u16 = PRESET_PANE_W + 1;

/// Render the picker popup at its computed placement and record this
/// frame's hit rects. Placement runs from the picker's measured size
/// every frame, so month and view changes re-anchor before painting.
pub fn render_picker(frame: &mut Frame, picker: &mut Picker) {
    picker.clear_hit_rects();

    let placement = compute_placement(picker.trigger, picker.size(), frame.area(), picker.insets);
    let area = placement.rect.intersection(frame.area());
    if area.width < 8 || area.height < 3 {
        // Nothing useful fits; skip the frame rather than paint garbage
        return;
    }
    picker.popup_rect = Some(area);

    let theme = picker.theme.clone();
    let bg = theme.background;

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border).bg(bg))
        .style(Style::default().bg(bg))
        .title(Span::styled(
            " Schedule ",
            Style::default().fg(theme.text_bright).bg(bg),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut y = inner.y;
    if let Some(row) = next_row(inner, &mut y) {
        render_tab_row(frame, picker, &theme, row);
    }
    match picker.view {
        View::Quick => render_quick_body(frame, picker, &theme, inner, &mut y),
        View::Recurring => render_recurring_body(frame, picker, &theme, inner, &mut y),
    }
    if let Some(row) = next_row(inner, &mut y) {
        let rule = "\u{2500}".repeat(row.width as usize);
        let line = Line::from(Span::styled(rule, Style::default().fg(theme.dim).bg(bg)));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), row);
    }
    render_field_rows(frame, picker, &theme, inner, &mut y);
    if let Some(row) = next_row(inner, &mut y) {
        render_save_row(frame, picker, &theme, row);
    }
    if let Some(row) = next_row(inner, &mut y) {
        render_hint_row(frame, picker, &theme, row);
    }

    // The time dialog floats above everything else
    if let Some(dialog) = &picker.time_dialog {
        picker.time_dialog_rect = render_time_dialog(
            frame,
            &theme,
            picker.insets,
            dialog,
            &mut picker.time_entry_rects,
        );
    }
}

/// The next one-cell-high row inside `inner`, or None once the popup's
/// clamped height is used up (rows past the clamp are shed).
fn next_row(inner: Rect, y: &mut u16) -> Option<Rect> {
    if *y >= inner.bottom() {
        return None;
    }
    let row = Rect::new(inner.x, *y, inner.width, 1);
    *y += 1;
    Some(row)
}

/// A width-clamped hit rect at `x` on `row`, or None when fully clipped
fn clipped(row: Rect, x: u16, width: u16) -> Option<Rect> {
    if x >= row.right() {
        return None;
    }
    let width = width.min(row.right() - x);
    Some(Rect::new(x, row.y, width, 1))
}

fn render_tab_row(frame: &mut Frame, picker: &mut Picker, theme: &Theme, row: Rect) {
    let bg = theme.background;
    let tab_style = |selected: bool| {
        if selected {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        }
    };

    let quick_label = " Quick ";
    let recurring_label = " Recurring ";
    let spans = vec![
        Span::styled(quick_label, tab_style(picker.view == View::Quick)),
        Span::styled("\u{2502}", Style::default().fg(theme.dim).bg(bg)),
        Span::styled(recurring_label, tab_style(picker.view == View::Recurring)),
    ];

    if let Some(rect) = clipped(row, row.x, quick_label.len() as u16) {
        picker.tab_rects.push((rect, View::Quick));
    }
    let recurring_x = row.x + quick_label.len() as u16 + 1;
    if let Some(rect) = clipped(row, recurring_x, recurring_label.len() as u16) {
        picker.tab_rects.push((rect, View::Recurring));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        row,
    );
}

// ---------------------------------------------------------------------------
// Quick view body: preset pane | calendar pane
// ---------------------------------------------------------------------------

fn render_quick_body(
    frame: &mut Frame,
    picker: &mut Picker,
    theme: &Theme,
    inner: Rect,
    y: &mut u16,
) {
    let bg = theme.background;
    let cells = calendar_cells(
        picker.month,
        picker.week_start,
        &picker.selection.range,
        picker.now,
    );

    for body_row in 0..BODY_ROWS {
        let Some(row) = next_row(inner, y) else {
            break;
        };
        let mut spans: Vec<Span> = Vec::new();

        // Preset pane
        let preset_idx = body_row as usize;
        if preset_idx < QUICK_PRESETS.len() {
            let preset = QUICK_PRESETS[preset_idx];
            let selected = picker.focus == Focus::Presets && picker.preset_cursor == preset_idx;
            let style = if selected {
                Style::default()
                    .fg(theme.text_bright)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text).bg(bg)
            };
            let prefix = if selected { " \u{25B8} " } else { "   " };
            spans.push(Span::styled(prefix, style));
            spans.push(Span::styled(format!("{:<13}", preset.label()), style));
            if let Some(rect) = clipped(row, row.x, PRESET_PANE_W) {
                picker.preset_rects.push((rect, preset_idx));
            }
        } else {
            spans.push(Span::styled(
                " ".repeat(PRESET_PANE_W as usize),
                Style::default().bg(bg),
            ));
        }
        spans.push(Span::styled(
            "\u{2502}",
            Style::default().fg(theme.dim).bg(bg),
        ));

        // Calendar pane
        match body_row {
            0 => {
                let label = picker.month.format("%B %Y").to_string();
                let nav_style = Style::default().fg(theme.highlight).bg(bg);
                spans.push(Span::styled(" \u{25C2} ", nav_style));
                spans.push(Span::styled(
                    format!("{:^24}", label),
                    Style::default().fg(theme.text_bright).bg(bg),
                ));
                spans.push(Span::styled(" \u{25B8} ", nav_style));
                if let Some(rect) = clipped(row, row.x + CALENDAR_PANE_X, 3) {
                    picker.month_nav_rects.push((rect, -1));
                }
                if let Some(rect) = clipped(row, row.x + CALENDAR_PANE_X + 27, 3) {
                    picker.month_nav_rects.push((rect, 1));
                }
            }
            1 => {
                spans.push(Span::styled(" ", Style::default().bg(bg)));
                let style = Style::default().fg(theme.dim).bg(bg);
                for label in weekday_labels(picker.week_start) {
                    spans.push(Span::styled(format!("{:>3} ", label), style));
                }
            }
            week_row => {
                spans.push(Span::styled(" ", Style::default().bg(bg)));
                let week = (week_row - 2) as usize;
                for col in 0..7 {
                    let cell = cells[week * 7 + col];
                    spans.push(Span::styled(
                        format!("{:>3} ", cell.date.day()),
                        cell_style(picker, theme, cell),
                    ));
                    let x = row.x + CALENDAR_PANE_X + 1 + col as u16 * 4;
                    if let Some(rect) = clipped(row, x, 4) {
                        picker.cell_rects.push((rect, cell.date));
                    }
                }
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
            row,
        );
    }

    // The grid area for drag hit tests is the union of the day cells
    picker.calendar_rect = picker
        .cell_rects
        .iter()
        .map(|(rect, _)| *rect)
        .reduce(|a, b| a.union(b));
}

fn cell_style(picker: &Picker, theme: &Theme, cell: CalendarCell) -> Style {
    let mut style = Style::default().bg(theme.background);
    style = style.fg(if cell.in_month { theme.text } else { theme.dim });
    if cell.is_today {
        style = style.fg(theme.today);
    }
    if cell.in_range {
        style = style.bg(theme.range_bg);
    }
    if cell.is_selected {
        style = style
            .fg(theme.text_bright)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD);
    }
    if picker.focus == Focus::Calendar && cell.date == picker.cursor_date {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

// ---------------------------------------------------------------------------
// Recurring view body
// ---------------------------------------------------------------------------

fn render_recurring_body(
    frame: &mut Frame,
    picker: &mut Picker,
    theme: &Theme,
    inner: Rect,
    y: &mut u16,
) {
    let bg = theme.background;
    let enabled = picker.recurrence_enabled;
    let rows = picker.recurrence_rows();

    for i in 0..rows {
        let Some(row) = next_row(inner, y) else {
            return;
        };
        let on_cursor = picker.recurring_cursor == i as usize;
        let prefix_style = Style::default().fg(theme.highlight).bg(bg);
        let label_style = if on_cursor {
            Style::default().fg(theme.text_bright).bg(bg)
        } else {
            Style::default().fg(theme.text).bg(bg)
        };
        let value_style = if enabled {
            Style::default().fg(theme.text).bg(bg)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };

        let prefix = if on_cursor { " \u{25B8} " } else { "   " };
        let mut spans = vec![Span::styled(prefix, prefix_style)];
        match i {
            0 => {
                spans.push(Span::styled(format!("{:<12}", "Repeat"), label_style));
                spans.push(Span::styled(
                    if enabled { "on" } else { "off" },
                    Style::default().fg(theme.text_bright).bg(bg),
                ));
            }
            1 => {
                spans.push(Span::styled(format!("{:<12}", "Frequency"), label_style));
                spans.push(Span::styled(
                    format!("\u{25C2} {} \u{25B8}", picker.recurrence_draft.frequency),
                    value_style,
                ));
            }
            2 => {
                spans.push(Span::styled(format!("{:<12}", "Interval"), label_style));
                spans.push(Span::styled(
                    format!("\u{25C2} {} \u{25B8}", picker.recurrence_draft.interval),
                    value_style,
                ));
            }
            n => {
                // Opaque passthrough options, shown but never edited
                let idx = n as usize - 3;
                if let Some((key, value)) = picker.recurrence_draft.options.get_index(idx) {
                    spans.push(Span::styled(
                        format!("{:<12}", key),
                        Style::default().fg(theme.dim).bg(bg),
                    ));
                    spans.push(Span::styled(
                        value.clone(),
                        Style::default().fg(theme.dim).bg(bg),
                    ));
                }
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
            row,
        );
    }
}

// ---------------------------------------------------------------------------
// Field rows, save, hints
// ---------------------------------------------------------------------------

fn render_field_rows(
    frame: &mut Frame,
    picker: &mut Picker,
    theme: &Theme,
    inner: Rect,
    y: &mut u16,
) {
    let bg = theme.background;
    for (field, label) in [(ActiveField::Start, "Start"), (ActiveField::Due, "Due")] {
        let Some(row) = next_row(inner, y) else {
            return;
        };
        let value = picker.field_value(field);
        let is_active = picker.selection.active == field;

        let prefix = if is_active { " \u{25B8} " } else { "   " };
        let label_style = if is_active {
            Style::default()
                .fg(theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(bg)
        };
        let date_text = value
            .map(|v| v.date().format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| "--".to_string());
        let date_style = if value.is_some() {
            Style::default().fg(theme.text).bg(bg)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };
        let time = value.and_then(|v| v.time());
        let time_text = time
            .map(|t| format_twelve_hour(t.hour(), t.minute()))
            .unwrap_or_else(|| "--".to_string());
        let time_style = if time.is_some() {
            Style::default().fg(theme.today).bg(bg)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };

        let mut spans = vec![
            Span::styled(prefix, Style::default().fg(theme.highlight).bg(bg)),
            Span::styled(format!("{:<6}", label), label_style),
            Span::styled(format!("{:<13}", date_text), date_style),
            Span::styled(" ", Style::default().bg(bg)),
            Span::styled(format!("{:<8}", time_text), time_style),
            Span::styled("  ", Style::default().bg(bg)),
        ];
        if value.is_some() {
            spans.push(Span::styled("[x]", Style::default().fg(theme.dim).bg(bg)));
        }

        if let Some(rect) = clipped(row, row.x, 22) {
            picker.field_rects.push((rect, field));
        }
        if let Some(rect) = clipped(row, row.x + 23, 8) {
            picker.time_rects.push((rect, field));
        }
        if value.is_some()
            && let Some(rect) = clipped(row, row.x + 33, 3)
        {
            picker.clear_rects.push((rect, field));
        }

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
            row,
        );
    }
}

fn render_save_row(frame: &mut Frame, picker: &mut Picker, theme: &Theme, row: Rect) {
    let bg = theme.background;
    let label = "[ Save ]";
    let line = Line::from(Span::styled(
        format!("{:^width$}", label, width = row.width as usize),
        Style::default()
            .fg(theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    let x = row.x + row.width.saturating_sub(label.len() as u16) / 2;
    picker.save_rect = clipped(row, x, label.len() as u16);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), row);
}

fn render_hint_row(frame: &mut Frame, picker: &Picker, theme: &Theme, row: Rect) {
    let bg = theme.background;
    let line = if let Some(status) = &picker.status {
        Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(theme.warning).bg(bg),
        ))
    } else {
        let hints = if picker.time_dialog.is_some() {
            " j/k move  enter pick  esc cancel"
        } else {
            match picker.view {
                View::Quick => " v drag  t time  x clear  r repeat  s save",
                View::Recurring => " space toggle  h/l adjust  r dates  s save",
            }
        };
        Line::from(Span::styled(hints, Style::default().fg(theme.dim).bg(bg)))
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), row);
}
