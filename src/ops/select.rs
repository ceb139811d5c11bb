use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::model::{ActiveField, DateValue, DragSession, DragState, PreservedTimes, Selection};

// ---------------------------------------------------------------------------
// Time-of-day merging
// ---------------------------------------------------------------------------

/// Attach the time of day from `source` onto `target`, seconds zeroed.
/// A source with no time component (or no source at all) yields the bare
/// date. Every date commit in the machine routes through here so a
/// previously chosen time is never silently dropped.
pub fn merge_time(target: NaiveDate, source: Option<&DateValue>) -> DateValue {
    match source.and_then(|v| v.time()) {
        Some(t) => {
            let t = NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t);
            DateValue::DateTime(target.and_time(t))
        }
        None => DateValue::Date(target),
    }
}

// ---------------------------------------------------------------------------
// Press / drag / release
// ---------------------------------------------------------------------------

/// Pointer down on a calendar cell. Every press opens a drag session
/// anchored at the pressed cell; whether it starts a new range or
/// completes the open one depends on what is already selected.
pub fn press(sel: &mut Selection, date: NaiveDate) {
    let preserved = match sel.range.start {
        // A start with no due, input targeting due: this press completes
        // the range
        Some(start) if sel.range.due.is_none() && sel.active == ActiveField::Due => {
            // Reuse the snapshot held since the press that opened the
            // range; capture now only when the start arrived some other
            // way (seeded, or quick-picked)
            let preserved = sel
                .held_times
                .take()
                .unwrap_or_else(|| PreservedTimes::capture(&sel.range));
            let start_date = start.date();
            if date < start_date {
                // Pressed before the existing start: the press takes the
                // start role and the old start becomes the due end
                sel.range.start = Some(merge_time(date, preserved.start.as_ref()));
                sel.range.due = Some(merge_time(start_date, preserved.due_source()));
            } else {
                sel.range.due = Some(merge_time(date, preserved.due_source()));
            }
            preserved
        }
        // Fresh range start: anchor a new range at the pressed cell. The
        // snapshot outlives this gesture because the due end it wipes
        // still owes its time to the completing press.
        _ => {
            let preserved = PreservedTimes::capture(&sel.range);
            sel.range.start = Some(merge_time(date, preserved.start.as_ref()));
            sel.range.due = None;
            sel.active = ActiveField::Due;
            sel.held_times = Some(preserved);
            preserved
        }
    };

    sel.drag = DragState::Dragging(DragSession {
        anchor: date,
        preserved,
    });
}

/// Pointer entered a different cell while dragging. The range is
/// recomputed from scratch between the anchor and the current cell, with
/// the session's preserved times reattached to whichever end they belong
/// to now.
pub fn drag_to(sel: &mut Selection, date: NaiveDate) {
    let DragState::Dragging(session) = sel.drag else {
        return;
    };
    let (lo, hi) = if date < session.anchor {
        (date, session.anchor)
    } else {
        (session.anchor, date)
    };
    sel.range.start = Some(merge_time(lo, session.preserved.start.as_ref()));
    sel.range.due = Some(merge_time(hi, session.preserved.due_source()));
}

/// Pointer released, or the drag left the calendar grid entirely. The
/// gesture ends; whatever range is live stays.
pub fn release(sel: &mut Selection) {
    sel.drag = DragState::Idle;
}

// ---------------------------------------------------------------------------
// Quick picks
// ---------------------------------------------------------------------------

/// Put a resolved preset date into the active field. Ignored while a
/// drag is in progress. Setting the start flips input to the due field;
/// setting the due leaves it there.
pub fn quick_pick(sel: &mut Selection, date: NaiveDate) {
    if sel.drag.is_dragging() {
        return;
    }
    let preserved = PreservedTimes::capture(&sel.range);
    match sel.active {
        ActiveField::Start => {
            sel.range.start = Some(merge_time(date, preserved.start.as_ref()));
            sel.active = ActiveField::Due;
        }
        ActiveField::Due => {
            sel.range.due = Some(merge_time(date, preserved.due_source()));
        }
    }
    normalize(sel, &preserved);
}

/// Swap the ends if the pair inverted. Each role keeps its own time
/// source; equal dates are left alone.
fn normalize(sel: &mut Selection, preserved: &PreservedTimes) {
    if let (Some(s), Some(d)) = (sel.range.start, sel.range.due)
        && s.date() > d.date()
    {
        sel.range.start = Some(merge_time(d.date(), preserved.start.as_ref()));
        sel.range.due = Some(merge_time(s.date(), preserved.due_source()));
    }
}

// ---------------------------------------------------------------------------
// Field edits
// ---------------------------------------------------------------------------

/// Merge a chosen time of day into a field's current date. A field with
/// no date yet ignores the time.
pub fn set_time(sel: &mut Selection, field: ActiveField, hour: u32, minute: u32) {
    let slot = match field {
        ActiveField::Start => &mut sel.range.start,
        ActiveField::Due => &mut sel.range.due,
    };
    if let Some(value) = *slot
        && let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0)
    {
        *slot = Some(DateValue::DateTime(value.date().and_time(time)));
    }
}

/// Clear one end of the range. Clearing the start clears the due end too
/// (a due without a start is not representable in the UI), and input
/// returns to the cleared field. A cleared field's time is gone for
/// good, so any held snapshot goes with it.
pub fn clear(sel: &mut Selection, field: ActiveField) {
    sel.held_times = None;
    match field {
        ActiveField::Start => {
            sel.range.start = None;
            sel.range.due = None;
            sel.active = ActiveField::Start;
        }
        ActiveField::Due => {
            sel.range.due = None;
            sel.active = ActiveField::Due;
        }
    }
}
