use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Days from the start of the week to the weekend day presets target
const WEEKEND_OFFSET_DAYS: i64 = 6;

/// A named relative-date shortcut in the quick list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickPreset {
    Today,
    Tomorrow,
    NextWeek,
    NextWeekend,
    TwoWeeks,
    FourWeeks,
    EightWeeks,
}

/// Display order of the quick list
pub const QUICK_PRESETS: [QuickPreset; 7] = [
    QuickPreset::Today,
    QuickPreset::Tomorrow,
    QuickPreset::NextWeek,
    QuickPreset::NextWeekend,
    QuickPreset::TwoWeeks,
    QuickPreset::FourWeeks,
    QuickPreset::EightWeeks,
];

impl QuickPreset {
    pub fn label(self) -> &'static str {
        match self {
            QuickPreset::Today => "Today",
            QuickPreset::Tomorrow => "Tomorrow",
            QuickPreset::NextWeek => "Next week",
            QuickPreset::NextWeekend => "Next weekend",
            QuickPreset::TwoWeeks => "2 weeks",
            QuickPreset::FourWeeks => "4 weeks",
            QuickPreset::EightWeeks => "8 weeks",
        }
    }

    /// Resolve to a concrete date. `now` is passed in by the caller and
    /// fixed for the picker session; nothing here reads the clock.
    pub fn resolve(self, now: NaiveDate, week_start: Weekday) -> NaiveDate {
        match self {
            QuickPreset::Today => now,
            QuickPreset::Tomorrow => now + Duration::days(1),
            QuickPreset::NextWeek => now + Duration::weeks(1),
            QuickPreset::NextWeekend => {
                week_start_of(now, week_start) + Duration::weeks(1) + Duration::days(WEEKEND_OFFSET_DAYS)
            }
            QuickPreset::TwoWeeks => now + Duration::weeks(2),
            QuickPreset::FourWeeks => now + Duration::weeks(4),
            QuickPreset::EightWeeks => now + Duration::weeks(8),
        }
    }
}

/// The `week_start` day on or before `date`
pub fn week_start_of(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    date - Duration::days(date.weekday().days_since(week_start) as i64)
}
