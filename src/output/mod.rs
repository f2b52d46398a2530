//! Output encoders for rendered frames.

mod png_encoder;

pub use png_encoder::PngEncoder;

use crate::chart::{Layout, Scene};
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;

/// Composite a rendered scene into a single framebuffer at the layout
/// margins, for snapshot export.
///
/// Layers land in paint order: heatmap, then the label strip alpha-blended
/// over its left edge, then the marginal strips in the right and bottom
/// margins. Text layers (label text, ticks, tooltip) are not rasterized.
///
/// # Errors
///
/// Returns an error for degenerate layout dimensions.
pub fn composite_scene(scene: &Scene, layout: &Layout) -> Result<Framebuffer> {
    let mut fb = Framebuffer::new(layout.width, layout.height)?;
    fb.clear(Rgba::WHITE);

    let left = layout.margins.left;
    let top = layout.margins.top;
    blend_layer(&mut fb, &scene.heatmap, left, top);
    blend_layer(&mut fb, &scene.label_axis, left, top);
    blend_layer(
        &mut fb,
        &scene.y_histogram,
        left + layout.canvas_width + 4,
        top,
    );
    blend_layer(
        &mut fb,
        &scene.x_histogram,
        left,
        top + layout.canvas_height + 4,
    );
    Ok(fb)
}

/// Alpha-blend a whole layer into `dst` at an offset, clipping at the
/// destination edges.
fn blend_layer(dst: &mut Framebuffer, src: &Framebuffer, offset_x: u32, offset_y: u32) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            if let Some(color) = src.get_pixel(x, y) {
                if color.a > 0 {
                    dst.blend_pixel(offset_x + x, offset_y + y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::HeatmapChart;
    use crate::test_fixtures::sample_data;

    #[test]
    fn test_composite_dimensions_and_placement() {
        let mut chart = HeatmapChart::new(530, 395).unwrap();
        chart.set_data(sample_data(4, 3)).unwrap();
        let scene = chart.render().unwrap();
        let fb = composite_scene(&scene, chart.layout()).unwrap();

        assert_eq!(fb.width(), 530);
        assert_eq!(fb.height(), 395);
        // Margin corner stays background
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
        // Plot center carries the heatmap pixel
        assert_eq!(
            fb.get_pixel(90 + 200, 25 + 150),
            scene.heatmap.get_pixel(200, 150)
        );
    }
}
