//! Marginal histogram strips along both plot axes.
//!
//! Two independent 1-D density views of the active channel: per time bucket
//! (drawn under the plot) and per key bucket (drawn beside it). Bars are
//! positioned through the same rescaled domain scales as the heatmap, so
//! the strips stay pixel-aligned with the main plot under any transform.

use crate::axis::overlaps;
use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::scale::LinearScale;

/// Depth of a histogram strip, pixels.
pub const STRIP_DEPTH: u32 = 30;

const BAR_FILL: Rgba = Rgba::rgb(70, 130, 180);
const BAR_FILL_FOCUS: Rgba = Rgba::rgb(255, 165, 0);

/// Render the time-axis marginal into a horizontal strip
/// (`canvas_width x STRIP_DEPTH`), bars anchored at the bottom edge.
pub fn render_x_histogram(
    fb: &mut Framebuffer,
    sums: &[f32],
    focus: Option<(f32, f32)>,
    x_rescale: &LinearScale,
) {
    fb.clear(Rgba::TRANSPARENT);
    let strip_width = fb.width() as f32;
    let depth = fb.height() as f32;
    let max = max_sum(sums);

    for (idx, &sum) in sums.iter().enumerate() {
        let left = x_rescale.scale(idx as f32).max(0.0);
        let right = x_rescale.scale(idx as f32 + 1.0).min(strip_width);
        if right <= left {
            continue;
        }
        let bar = bar_length(sum, max, depth);
        if bar == 0 {
            continue;
        }
        let color = bar_color(idx, focus);
        fb.fill_rect(
            left as u32,
            depth as u32 - bar,
            (right - left).ceil() as u32,
            bar,
            color,
        );
    }
}

/// Render the key-axis marginal into a vertical strip
/// (`STRIP_DEPTH x canvas_height`), bars anchored at the left edge.
pub fn render_y_histogram(
    fb: &mut Framebuffer,
    sums: &[f32],
    focus: Option<(f32, f32)>,
    y_rescale: &LinearScale,
) {
    fb.clear(Rgba::TRANSPARENT);
    let strip_height = fb.height() as f32;
    let depth = fb.width() as f32;
    let max = max_sum(sums);

    for (idx, &sum) in sums.iter().enumerate() {
        let top = y_rescale.scale(idx as f32).max(0.0);
        let bottom = y_rescale.scale(idx as f32 + 1.0).min(strip_height);
        if bottom <= top {
            continue;
        }
        let bar = bar_length(sum, max, depth);
        if bar == 0 {
            continue;
        }
        let color = bar_color(idx, focus);
        fb.fill_rect(0, top as u32, bar, (bottom - top).ceil() as u32, color);
    }
}

fn max_sum(sums: &[f32]) -> f32 {
    sums.iter().copied().fold(0.0_f32, f32::max)
}

fn bar_length(sum: f32, max: f32, depth: f32) -> u32 {
    if max <= 0.0 {
        return 0;
    }
    (sum / max * depth).round() as u32
}

fn bar_color(idx: usize, focus: Option<(f32, f32)>) -> Rgba {
    let focused = focus.is_some_and(|f| overlaps(idx as f32, idx as f32 + 1.0, f));
    if focused {
        BAR_FILL_FOCUS
    } else {
        BAR_FILL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_histogram_bar_heights() {
        let mut fb = Framebuffer::new(100, STRIP_DEPTH).unwrap();
        let x_scale = LinearScale::new((0.0, 4.0), (0.0, 100.0)).unwrap();
        render_x_histogram(&mut fb, &[0.0, 50.0, 100.0, 25.0], None, &x_scale);

        // Max bucket (index 2, pixels 50..75) reaches the top of the strip
        assert_eq!(fb.get_pixel(60, 0), Some(BAR_FILL));
        // Zero bucket stays empty
        assert_eq!(fb.get_pixel(10, STRIP_DEPTH - 1), Some(Rgba::TRANSPARENT));
        // Half-height bucket fills the bottom half only
        assert_eq!(fb.get_pixel(30, 5), Some(Rgba::TRANSPARENT));
        assert_eq!(fb.get_pixel(30, STRIP_DEPTH - 5), Some(BAR_FILL));
    }

    #[test]
    fn test_y_histogram_bar_widths() {
        let mut fb = Framebuffer::new(STRIP_DEPTH, 80).unwrap();
        let y_scale = LinearScale::new((0.0, 2.0), (0.0, 80.0)).unwrap();
        render_y_histogram(&mut fb, &[100.0, 50.0], None, &y_scale);

        assert_eq!(fb.get_pixel(STRIP_DEPTH - 1, 10), Some(BAR_FILL));
        assert_eq!(fb.get_pixel(STRIP_DEPTH - 1, 70), Some(Rgba::TRANSPARENT));
        assert_eq!(fb.get_pixel(10, 70), Some(BAR_FILL));
    }

    #[test]
    fn test_focus_highlights_bucket() {
        let mut fb = Framebuffer::new(100, STRIP_DEPTH).unwrap();
        let x_scale = LinearScale::new((0.0, 4.0), (0.0, 100.0)).unwrap();
        render_x_histogram(
            &mut fb,
            &[100.0, 100.0, 100.0, 100.0],
            Some((1.5, 1.501)),
            &x_scale,
        );

        assert_eq!(fb.get_pixel(30, 10), Some(BAR_FILL_FOCUS));
        assert_eq!(fb.get_pixel(60, 10), Some(BAR_FILL));
    }

    #[test]
    fn test_all_zero_sums_render_empty() {
        let mut fb = Framebuffer::new(100, STRIP_DEPTH).unwrap();
        let x_scale = LinearScale::new((0.0, 4.0), (0.0, 100.0)).unwrap();
        render_x_histogram(&mut fb, &[0.0; 4], None, &x_scale);
        assert_eq!(fb.get_pixel(50, 15), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_offscreen_buckets_skipped_under_zoom() {
        let mut fb = Framebuffer::new(100, STRIP_DEPTH).unwrap();
        // Zoomed so that only buckets 2..4 are visible
        let x_scale = LinearScale::new((0.0, 4.0), (-100.0, 100.0)).unwrap();
        render_x_histogram(&mut fb, &[100.0, 100.0, 100.0, 100.0], None, &x_scale);
        // Visible region is fully covered by the on-screen buckets
        assert_eq!(fb.get_pixel(10, 10), Some(BAR_FILL));
        assert_eq!(fb.get_pixel(90, 10), Some(BAR_FILL));
    }
}
