use ratatui::layout::{Rect, Size};

use crate::model::PlacementConfig;

/// Spacing constants for anchored placement. The units are whatever the
/// viewport is measured in; the terminal embedding passes a compact set
/// via [`PlacementConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementInsets {
    /// Extra room required beyond the popup height before a side is chosen
    pub threshold: u16,
    /// Space between the trigger and the popup
    pub gap: u16,
    /// Clearance kept from viewport edges when clamping
    pub inset: u16,
}

impl Default for PlacementInsets {
    fn default() -> Self {
        PlacementInsets {
            threshold: 10,
            gap: 5,
            inset: 20,
        }
    }
}

impl From<&PlacementConfig> for PlacementInsets {
    fn from(config: &PlacementConfig) -> Self {
        PlacementInsets {
            threshold: config.threshold,
            gap: config.gap,
            inset: config.inset,
        }
    }
}

/// Which side of the trigger the popup landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSide {
    Below,
    Above,
}

/// A computed popup position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rect: Rect,
    pub side: VerticalSide,
    /// The requested height did not fit and was clamped; the popup body
    /// should shed low-priority content instead of overflowing
    pub clamped: bool,
}

/// Place a popup of `size` relative to `trigger` inside `viewport`.
///
/// Vertical: below the trigger when the popup plus threshold fits, else
/// above when that fits, else whichever side has more room with the
/// height clamped to the available space minus the inset. Horizontal:
/// left-aligned to the trigger unless that overflows the right edge, in
/// which case right-align to the trigger when the trigger is at least as
/// wide as the popup, else clamp to the inset from the right edge.
///
/// With no trigger the popup is placed statically at the top left of the
/// viewport (inline mode), never anchored to anything.
pub fn compute_placement(
    trigger: Option<Rect>,
    size: Size,
    viewport: Rect,
    insets: PlacementInsets,
) -> Placement {
    let trigger = match trigger {
        Some(t) => t,
        None => return inline_placement(size, viewport),
    };

    let space_below = viewport.bottom().saturating_sub(trigger.bottom());
    let space_above = trigger.y.saturating_sub(viewport.y);
    let need = size.height.saturating_add(insets.threshold);

    let (side, y, height, clamped) = if space_below >= need {
        (VerticalSide::Below, trigger.bottom() + insets.gap, size.height, false)
    } else if space_above >= need {
        let y = trigger.y.saturating_sub(insets.gap + size.height);
        (VerticalSide::Above, y.max(viewport.y), size.height, false)
    } else if space_below >= space_above {
        let height = size.height.min(space_below.saturating_sub(insets.inset));
        (VerticalSide::Below, trigger.bottom() + insets.gap, height, true)
    } else {
        let height = size.height.min(space_above.saturating_sub(insets.inset));
        let y = trigger.y.saturating_sub(insets.gap + height);
        (VerticalSide::Above, y.max(viewport.y), height, true)
    };

    let right_limit = viewport.right().saturating_sub(insets.inset);
    let x = if trigger.x.saturating_add(size.width) > right_limit {
        if trigger.width >= size.width {
            // The trigger is wide enough to right-align against
            trigger.right().saturating_sub(size.width)
        } else {
            right_limit.saturating_sub(size.width).max(viewport.x)
        }
    } else {
        trigger.x
    };

    Placement {
        rect: Rect::new(x, y, size.width, height),
        side,
        clamped,
    }
}

/// Static placement for a picker with no trigger: pinned to the top left
/// of the viewport area, clipped to it if the viewport is smaller.
fn inline_placement(size: Size, viewport: Rect) -> Placement {
    let width = size.width.min(viewport.width);
    let height = size.height.min(viewport.height);
    Placement {
        rect: Rect::new(viewport.x, viewport.y, width, height),
        side: VerticalSide::Below,
        clamped: height < size.height,
    }
}
