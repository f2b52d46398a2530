//! Hierarchical label-axis aggregation and rendering.
//!
//! Runs of identical non-absent labels are collapsed into sections once per
//! data change, independently per hierarchy level. Each render pass scales
//! the sections through the current y transform, draws their blocks into
//! the label strip and decides which sections are tall enough to carry
//! text.

use crate::axis::overlaps;
use crate::color::Rgba;
use crate::data::{KeyAxisEntry, LABEL_LEVELS};
use crate::framebuffer::Framebuffer;
use crate::scale::LinearScale;
use crate::util::truncate_chars;

/// Width of one label column, pixels.
pub const COLUMN_WIDTH: u32 = 28;

/// Gap between label columns, pixels.
pub const COLUMN_GAP: u32 = 4;

/// Total width of the label strip (four columns).
pub const STRIP_WIDTH: u32 = LABEL_LEVELS as u32 * (COLUMN_WIDTH + COLUMN_GAP) - COLUMN_GAP;

/// Minimum rendered section height for its text to be drawn, pixels.
const MIN_TEXT_HEIGHT: f32 = 17.0;

/// Average character width heuristic used to fit text, pixels.
const AVG_CHAR_WIDTH: f32 = 7.5;

const BLOCK_FILL: Rgba = Rgba::rgb(51, 51, 51);
const BLOCK_FILL_FOCUS: Rgba = Rgba::rgb(204, 204, 204);
const BLOCK_STROKE: Rgba = Rgba::WHITE;

/// A maximal run of buckets sharing one label at one hierarchy level.
/// Indices are half-open: `[start_idx, end_idx)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSection {
    /// The shared label value.
    pub value: String,
    /// First key-axis index of the run.
    pub start_idx: usize,
    /// One past the last key-axis index of the run.
    pub end_idx: usize,
}

/// A label section mapped to strip pixels for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySection {
    /// The shared label value.
    pub value: String,
    /// Text to draw, already truncated to fit; `None` when the section is
    /// too short for readable text (the block is still drawn).
    pub text: Option<String>,
    /// Top edge in strip pixels.
    pub start_px: f32,
    /// Bottom edge in strip pixels.
    pub end_px: f32,
    /// Whether the focus window overlaps this section.
    pub focused: bool,
}

/// Collapse the key axis into label sections, one list per hierarchy level.
///
/// Absent labels break runs without emitting a section, so the produced
/// ranges partition exactly the indices whose label is present.
#[must_use]
pub fn aggregate_labels(key_axis: &[KeyAxisEntry]) -> [Vec<LabelSection>; LABEL_LEVELS] {
    std::array::from_fn(|level| {
        let mut sections = Vec::new();
        let mut last: Option<&str> = None;
        let mut run_start: Option<usize> = None;

        for (idx, entry) in key_axis.iter().enumerate() {
            let label = entry.labels[level].as_deref();
            if label != last {
                if let (Some(start), Some(value)) = (run_start, last) {
                    sections.push(LabelSection {
                        value: value.to_string(),
                        start_idx: start,
                        end_idx: idx,
                    });
                }
                run_start = label.map(|_| idx);
            }
            last = label;
        }
        if let (Some(start), Some(value)) = (run_start, last) {
            sections.push(LabelSection {
                value: value.to_string(),
                start_idx: start,
                end_idx: key_axis.len(),
            });
        }
        sections
    })
}

/// Map one level's sections through the current y screen scale, clipping to
/// the strip and resolving focus and text fitting.
#[must_use]
pub fn scale_sections(
    sections: &[LabelSection],
    focus: Option<(f32, f32)>,
    y_rescale: &LinearScale,
    strip_height: f32,
) -> Vec<DisplaySection> {
    sections
        .iter()
        .filter_map(|section| {
            let start_px = y_rescale.scale(section.start_idx as f32);
            let end_px = y_rescale.scale(section.end_idx as f32);
            if end_px <= 0.0 || start_px >= strip_height {
                return None;
            }
            let clipped_start = start_px.max(0.0);
            let clipped_end = end_px.min(strip_height);
            let focused = focus
                .is_some_and(|f| overlaps(section.start_idx as f32, section.end_idx as f32, f));
            Some(DisplaySection {
                value: section.value.clone(),
                text: fit_label_text(&section.value, clipped_end - clipped_start),
                start_px: clipped_start,
                end_px: clipped_end,
                focused,
            })
        })
        .collect()
}

/// Truncate a label to the characters that fit a section of the given
/// rendered height (labels draw rotated, so height is the text run length).
fn fit_label_text(value: &str, height_px: f32) -> Option<String> {
    if height_px < MIN_TEXT_HEIGHT || value.is_empty() {
        return None;
    }
    let max_chars = (height_px / AVG_CHAR_WIDTH).floor() as usize;
    let fitted = truncate_chars(value, max_chars);
    if fitted.is_empty() {
        None
    } else {
        Some(fitted)
    }
}

/// Draw all four label columns into the strip framebuffer and return the
/// scaled sections (including fitted text) for the host to draw text over.
pub fn render_label_axis(
    fb: &mut Framebuffer,
    groups: &[Vec<LabelSection>; LABEL_LEVELS],
    focus: Option<(f32, f32)>,
    y_rescale: &LinearScale,
) -> [Vec<DisplaySection>; LABEL_LEVELS] {
    fb.clear(Rgba::TRANSPARENT);
    let strip_height = fb.height() as f32;

    std::array::from_fn(|level| {
        let scaled = scale_sections(&groups[level], focus, y_rescale, strip_height);
        let column_x = level as u32 * (COLUMN_WIDTH + COLUMN_GAP);

        for section in &scaled {
            let top = section.start_px as u32;
            let height = (section.end_px - section.start_px).max(0.0) as u32;
            let fill = if section.focused {
                BLOCK_FILL_FOCUS
            } else {
                BLOCK_FILL
            };
            fb.fill_rect(column_x, top, COLUMN_WIDTH, height, fill);
            // 1px separators between adjacent runs
            fb.fill_rect(column_x, top, COLUMN_WIDTH, 1, BLOCK_STROKE);
            if height > 0 {
                fb.fill_rect(column_x, top + height - 1, COLUMN_WIDTH, 1, BLOCK_STROKE);
            }
        }
        scaled
    })
}
