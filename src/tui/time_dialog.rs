use chrono::{NaiveTime, Timelike};
use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::ActiveField;
use crate::ops::{PlacementInsets, compute_placement};

use super::theme::Theme;

/// Maximum number of visible entries in the dropdown
const MAX_VISIBLE: usize = 8;

/// Cursor position when the field has no time yet: 9:00 am
const DEFAULT_MINUTES: u32 = 9 * 60;

/// A floating list of times of day, anchored to a field chip. Selecting
/// an entry hands its 12-hour label back to the picker, which parses and
/// merges it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDialog {
    /// Field whose date receives the chosen time
    pub field: ActiveField,
    pub entries: Vec<String>,
    pub cursor: usize,
    /// The chip rect the list hangs off
    pub anchor: Rect,
}

impl TimeDialog {
    pub fn open(field: ActiveField, current: Option<NaiveTime>, step: u32, anchor: Rect) -> Self {
        let entries = time_entries(step);
        let cursor = current
            .map(|t| format_twelve_hour(t.hour(), t.minute()))
            .and_then(|label| entries.iter().position(|e| *e == label))
            .unwrap_or_else(|| {
                ((DEFAULT_MINUTES / step.max(1)) as usize).min(entries.len().saturating_sub(1))
            });
        TimeDialog {
            field,
            entries,
            cursor,
            anchor,
        }
    }

    pub fn move_cursor(&mut self, delta: i32) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.cursor + delta as usize).min(last)
        };
    }

    /// The label under the cursor
    pub fn selected(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }
}

/// Every time of day at `step`-minute spacing, in 12-hour form
pub fn time_entries(step: u32) -> Vec<String> {
    let step = step.max(1);
    (0..24 * 60)
        .step_by(step as usize)
        .map(|m| format_twelve_hour(m / 60, m % 60))
        .collect()
}

/// "14:30" -> "2:30 pm"; hour 0 renders as 12 am, hour 12 as 12 pm
pub fn format_twelve_hour(hour: u32, minute: u32) -> String {
    let meridiem = if hour < 12 { "am" } else { "pm" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", h12, minute, meridiem)
}

/// Parse "2:30 pm" into (14, 30). "12:xx am" is midnight, "12:xx pm" is
/// noon, any other pm hour adds 12.
pub fn parse_twelve_hour(s: &str) -> Option<(u32, u32)> {
    let (time, meridiem) = s.trim().split_once(' ')?;
    let (h, m) = time.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h == 0 || h > 12 || m > 59 {
        return None;
    }
    match (meridiem, h) {
        ("am", 12) => Some((0, m)),
        ("am", h) => Some((h, m)),
        ("pm", 12) => Some((12, m)),
        ("pm", h) => Some((h + 12, m)),
        _ => None,
    }
}

/// Render the list floating next to its anchor, on top of the picker.
/// Records one hit rect per visible entry and returns the dialog area,
/// so the mouse handler can tell entry clicks from outside clicks.
pub fn render_time_dialog(
    frame: &mut Frame,
    theme: &Theme,
    insets: PlacementInsets,
    dialog: &TimeDialog,
    entry_rects: &mut Vec<(Rect, usize)>,
) -> Option<Rect> {
    let bg = theme.background;

    let count = dialog.entries.len().min(MAX_VISIBLE);
    let label_w = dialog.entries.iter().map(|e| e.len()).max().unwrap_or(8);
    let popup_w = (label_w + 6) as u16;
    let popup_h = count as u16 + 2;

    let placement = compute_placement(
        Some(dialog.anchor),
        Size::new(popup_w, popup_h),
        frame.area(),
        insets,
    );
    let area = placement.rect.intersection(frame.area());
    if area.height < 3 {
        return None;
    }

    // Scroll window around the cursor
    let visible = area.height.saturating_sub(2) as usize;
    let scroll_start = if visible > 0 && dialog.cursor >= visible {
        dialog.cursor - visible + 1
    } else {
        0
    };

    let mut lines: Vec<Line> = Vec::new();
    for (i, entry) in dialog.entries.iter().skip(scroll_start).take(visible).enumerate() {
        let is_selected = scroll_start + i == dialog.cursor;
        let style = if is_selected {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(bg)
        };
        let prefix = if is_selected { " \u{25B8} " } else { "   " };
        let label = format!("{:<w$}", entry, w = (popup_w as usize).saturating_sub(5));
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(label, style),
        ]));
        entry_rects.push((
            Rect::new(area.x + 1, area.y + 1 + i as u16, area.width.saturating_sub(2), 1),
            scroll_start + i,
        ));
    }

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
    Some(area)
}
