use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::model::SelectionRange;

/// The calendar always shows six full weeks
pub const GRID_WEEKS: usize = 6;
pub const GRID_DAYS: usize = GRID_WEEKS * 7;

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// The 42 dates shown for the month containing `reference`: from the
/// first `week_start` on or before the 1st through the end of the sixth
/// week. Always spills into the adjacent months as needed.
pub fn month_grid(reference: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let first = first_of_month(reference);
    let lead = first.weekday().days_since(week_start) as i64;
    let grid_start = first - Duration::days(lead);
    (0..GRID_DAYS as i64)
        .map(|i| grid_start + Duration::days(i))
        .collect()
}

/// First day of the month `delta` months away from the reference month.
/// Used by the header arrows, so it lands on day 1 regardless of where in
/// the month the reference sits.
pub fn shift_month(reference: NaiveDate, delta: i32) -> NaiveDate {
    let months = reference.year() * 12 + reference.month0() as i32 + delta;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    // month is 1..=12 by construction
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

/// One renderable cell of the grid, fully derived from the selection and
/// the displayed month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    /// An endpoint of the selection
    pub is_selected: bool,
    /// Inside the selected span (endpoints included)
    pub in_range: bool,
}

/// Derive the 42 cells for rendering. Recomputed every frame; holds no
/// state of its own.
pub fn calendar_cells(
    reference: NaiveDate,
    week_start: Weekday,
    range: &SelectionRange,
    today: NaiveDate,
) -> Vec<CalendarCell> {
    let month = reference.month();
    month_grid(reference, week_start)
        .into_iter()
        .map(|date| CalendarCell {
            date,
            in_month: date.month() == month && date.year() == reference.year(),
            is_today: date == today,
            is_selected: range.is_endpoint(date),
            in_range: range.contains(date),
        })
        .collect()
}

/// Weekday labels in display order starting from `week_start`
pub fn weekday_labels(week_start: Weekday) -> [&'static str; 7] {
    const NAMES: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    let mut labels = [""; 7];
    let offset = week_start.num_days_from_monday() as usize;
    for (i, label) in labels.iter_mut().enumerate() {
        *label = NAMES[(offset + i) % 7];
    }
    labels
}
