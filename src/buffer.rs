//! Full-resolution channel buffer pre-rendering.
//!
//! The buffer is rendered once per (data, channel, brightness) change at
//! exactly one pixel per matrix cell. Per-frame redraw then only blits and
//! rescales a sub-rectangle of it, which decouples the O(cells) coloring
//! cost from pan/zoom interaction.

use crate::data::Matrix;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::theme::ColorTheme;

/// Render a channel matrix into a raster at one pixel per cell.
///
/// Pixel `(t, k)` is `theme.background(matrix[t][k])`: the x axis is time,
/// the y axis is key space. Rebuilding with identical inputs produces a
/// byte-identical buffer.
///
/// # Errors
///
/// Returns [`Error::EmptyData`] when the matrix has no rows or columns.
pub fn render_channel_buffer(matrix: &Matrix, theme: &ColorTheme) -> Result<Framebuffer> {
    let time_buckets = matrix.len();
    let key_buckets = matrix.first().map_or(0, Vec::len);
    if time_buckets == 0 || key_buckets == 0 {
        return Err(Error::EmptyData);
    }

    let mut fb = Framebuffer::new(time_buckets as u32, key_buckets as u32)?;
    for (t, row) in matrix.iter().enumerate() {
        for (k, &value) in row.iter().enumerate() {
            fb.set_pixel(t as u32, k as u32, theme.background(value));
        }
    }
    Ok(fb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Matrix {
        (0..rows)
            .map(|t| (0..cols).map(|k| f(t, k)).collect())
            .collect()
    }

    #[test]
    fn test_buffer_dimensions_match_matrix() {
        let m = matrix(7, 5, |t, k| (t * k) as f64);
        let theme = ColorTheme::new(24.0, 1.0);
        let fb = render_channel_buffer(&m, &theme).unwrap();
        assert_eq!(fb.width(), 7);
        assert_eq!(fb.height(), 5);
    }

    #[test]
    fn test_buffer_pixel_matches_theme() {
        let m = matrix(3, 3, |t, k| (t + k) as f64);
        let theme = ColorTheme::new(4.0, 1.0);
        let fb = render_channel_buffer(&m, &theme).unwrap();
        assert_eq!(fb.get_pixel(2, 1), Some(theme.background(3.0)));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let m = matrix(6, 4, |t, k| (t * 31 + k * 7) as f64);
        let theme = ColorTheme::new(200.0, 1.3);
        let a = render_channel_buffer(&m, &theme).unwrap();
        let b = render_channel_buffer(&m, &theme).unwrap();
        assert_eq!(a.to_compact_pixels(), b.to_compact_pixels());
    }

    #[test]
    fn test_zero_matrix_renders_flat() {
        let m = matrix(4, 4, |_, _| 0.0);
        let theme = ColorTheme::new(0.0, 1.0);
        let fb = render_channel_buffer(&m, &theme).unwrap();
        let flat = fb.get_pixel(0, 0).unwrap();
        for t in 0..4 {
            for k in 0..4 {
                assert_eq!(fb.get_pixel(t, k), Some(flat));
            }
        }
    }

    #[test]
    fn test_empty_matrix_rejected() {
        let theme = ColorTheme::new(1.0, 1.0);
        assert!(render_channel_buffer(&Vec::new(), &theme).is_err());
        assert!(render_channel_buffer(&vec![Vec::new()], &theme).is_err());
    }
}
