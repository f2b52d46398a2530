//! Axis renderers: hierarchical key labels and marginal histograms.

pub mod histogram;
pub mod label;

/// The small domain window currently under the cursor, used to highlight
/// the marginal histograms and the label axis. Ephemeral: cleared when the
/// cursor leaves the plot and is not pinned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusWindow {
    /// Focused interval in time-bucket domain coordinates.
    pub x_domain: (f32, f32),
    /// Focused interval in key-bucket domain coordinates.
    pub y_domain: (f32, f32),
}

impl FocusWindow {
    /// A micro-interval focus window around a single domain point.
    #[must_use]
    pub fn at_point(x: f32, y: f32) -> Self {
        Self {
            x_domain: (x, x + 0.001),
            y_domain: (y, y + 0.001),
        }
    }
}

/// Whether a half-open domain interval overlaps a focus interval.
pub(crate) fn overlaps(start: f32, end: f32, focus: (f32, f32)) -> bool {
    start < focus.1 && end > focus.0
}
