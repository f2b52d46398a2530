//! Tooltip/cursor state machine and on-screen placement.
//!
//! The cursor is in one of three states: hidden, hovering (position tracks
//! the live pointer) or pinned (position frozen at a click until the next
//! click). Positions are stored in domain coordinates so the tooltip stays
//! glued to its cell across zoom and pan. Only a pinned tooltip accepts
//! pointer input; a hovering one must never block the gestures underneath.

use crate::color::Rgba;
use crate::data::{Channel, HeatmapData};
use crate::geometry::Point;
use crate::scale::LinearScale;
use crate::theme::ColorTheme;
use crate::util::truncate_chars;

/// Tooltip box width, pixels.
pub const TOOLTIP_WIDTH: f32 = 270.0;

/// Tooltip box height, pixels.
pub const TOOLTIP_HEIGHT: f32 = 190.0;

/// Gap between the cursor and the tooltip box, pixels.
const TOOLTIP_OFFSET: f32 = 20.0;

/// Displayed raw keys are cut to this many characters.
const KEY_DISPLAY_CHARS: usize = 30;

/// Cursor/tooltip state. Mutated only by pointer and click handlers, never
/// by redraw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CursorState {
    /// No tooltip shown.
    #[default]
    Hidden,
    /// Tooltip follows the pointer; position in domain coordinates.
    Hovering(Point),
    /// Tooltip frozen at a clicked position; interactive until un-pinned.
    Pinned(Point),
}

impl CursorState {
    /// Pointer moved; `domain` is its domain position, or `None` when the
    /// pointer is outside plot bounds. No effect while pinned.
    pub fn pointer_moved(&mut self, domain: Option<Point>) {
        if matches!(self, Self::Pinned(_)) {
            return;
        }
        *self = match domain {
            Some(p) => Self::Hovering(p),
            None => Self::Hidden,
        };
    }

    /// Pointer left the element. No effect while pinned.
    pub fn pointer_left(&mut self) {
        if !matches!(self, Self::Pinned(_)) {
            *self = Self::Hidden;
        }
    }

    /// Click handling: a click inside plot bounds pins the tooltip; any
    /// click while pinned un-pins, returning to hovering or hidden per the
    /// current pointer position.
    pub fn clicked(&mut self, domain: Option<Point>) {
        *self = match (*self, domain) {
            (Self::Pinned(_), Some(p)) => Self::Hovering(p),
            (Self::Pinned(_), None) => Self::Hidden,
            (_, Some(p)) => Self::Pinned(p),
            (state, None) => state,
        };
    }

    /// Current tooltip position in domain coordinates, if shown.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Hidden => None,
            Self::Hovering(p) | Self::Pinned(p) => Some(*p),
        }
    }

    /// Whether the tooltip is pinned.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned(_))
    }

    /// Whether the tooltip should intercept pointer events. Only a pinned
    /// tooltip is interactive (e.g. for copying displayed values).
    #[must_use]
    pub fn accepts_pointer(&self) -> bool {
        self.is_pinned()
    }
}

/// Clipped on-screen placement of the tooltip box, canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacement {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
    /// Whether the box intercepts pointer events.
    pub interactive: bool,
}

/// Compute the tooltip placement for the current cursor state.
///
/// The horizontal side flips at plot-center x, the vertical side at
/// plot-center y, and the final position is clamped so the box never clips
/// outside the canvas.
#[must_use]
pub fn placement(
    state: &CursorState,
    canvas_width: f32,
    canvas_height: f32,
    x_rescale: &LinearScale,
    y_rescale: &LinearScale,
) -> Option<TooltipPlacement> {
    let pos = state.position()?;
    let cx = x_rescale.scale(pos.x);
    let cy = y_rescale.scale(pos.y);

    let clamp_x = |x: f32| x.clamp(0.0, (canvas_width - TOOLTIP_WIDTH).max(0.0));
    let clamp_y = |y: f32| y.clamp(0.0, (canvas_height - TOOLTIP_HEIGHT).max(0.0));

    let right_x = clamp_x(cx + TOOLTIP_OFFSET);
    let left_x = clamp_x(cx - TOOLTIP_WIDTH - TOOLTIP_OFFSET);
    let bottom_y = clamp_y(cy + TOOLTIP_OFFSET);
    let top_y = clamp_y(cy - TOOLTIP_HEIGHT - TOOLTIP_OFFSET);

    Some(TooltipPlacement {
        x: if cx < canvas_width / 2.0 {
            right_x
        } else {
            left_x
        },
        y: if cy < canvas_height / 2.0 {
            bottom_y
        } else {
            top_y
        },
        width: TOOLTIP_WIDTH,
        height: TOOLTIP_HEIGHT,
        interactive: state.accepts_pointer(),
    })
}

/// Values displayed inside the tooltip for one cell, ready for the host to
/// lay out (and expose for copy-to-clipboard while pinned).
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    /// The cell value.
    pub value: f64,
    /// Unit of the active channel.
    pub unit: &'static str,
    /// Background color of the value chip, matching the heatmap cell.
    pub value_background: Rgba,
    /// Contrasting text color for the value chip.
    pub value_color: Rgba,
    /// The cell's bounding timestamps (bucket start, bucket end).
    pub time_range: (i64, i64),
    /// Raw start/end boundary keys, truncated for display.
    pub keys: (String, String),
    /// Joined hierarchical labels of the start/end boundaries.
    pub labels: (String, String),
}

/// Look up the cell under the cursor and assemble its tooltip content.
///
/// Floored domain coordinates are clamped to the valid bucket range, so the
/// lookup is safe even at the extreme edge bucket.
#[must_use]
pub fn content(
    state: &CursorState,
    data: &HeatmapData,
    channel: Channel,
    theme: &ColorTheme,
) -> Option<TooltipContent> {
    let pos = state.position()?;
    let time_idx = clamp_index(pos.x, data.time_buckets());
    let key_idx = clamp_index(pos.y, data.key_buckets());

    let value = data.data.get(channel)[time_idx][key_idx];
    let start = &data.key_axis[key_idx];
    let end = &data.key_axis[key_idx + 1];

    Some(TooltipContent {
        value,
        unit: channel.unit(),
        value_background: theme.background(value),
        value_color: theme.label(value),
        time_range: (data.time_axis[time_idx], data.time_axis[time_idx + 1]),
        keys: (
            truncate_chars(&start.key, KEY_DISPLAY_CHARS),
            truncate_chars(&end.key, KEY_DISPLAY_CHARS),
        ),
        labels: (joined_labels(start), joined_labels(end)),
    })
}

fn clamp_index(domain: f32, buckets: usize) -> usize {
    let idx = domain.floor();
    if idx < 0.0 {
        return 0;
    }
    (idx as usize).min(buckets.saturating_sub(1))
}

fn joined_labels(entry: &crate::data::KeyAxisEntry) -> String {
    entry
        .labels
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/")
}
