//! Rectangular brush selection over the heatmap.
//!
//! The brush is an explicit mode: the host arms it, the user drags one
//! rectangle, and the gesture resolves to a half-open selection in data
//! coordinates (timestamps and raw keys). The mode always disarms after a
//! drag finishes, successful or not.

use crate::data::HeatmapData;
use crate::geometry::{Point, Rect};
use crate::scale::LinearScale;
use crate::viewport::ViewportTransform;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A finished brush gesture resolved to data coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionRange {
    /// Timestamp of the first selected time bucket's left edge.
    pub start_time: i64,
    /// Timestamp of the last selected time bucket's right edge.
    pub end_time: i64,
    /// Raw key at the top edge of the selection.
    pub start_key: String,
    /// Raw key at the bottom edge of the selection.
    pub end_key: String,
}

/// Tracks one brush gesture in canvas coordinates.
#[derive(Debug, Default)]
pub struct BrushController {
    enabled: bool,
    origin: Option<Point>,
    current: Option<Point>,
}

impl BrushController {
    /// New, disarmed controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm or disarm the brush. Any in-progress gesture is discarded.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.origin = None;
        self.current = None;
    }

    /// Whether the brush is armed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a drag at a canvas position. Ignored while disarmed.
    pub fn begin(&mut self, canvas: Point) {
        if self.enabled {
            self.origin = Some(canvas);
            self.current = Some(canvas);
        }
    }

    /// Extend the current drag. Ignored when no drag is in progress.
    pub fn drag_to(&mut self, canvas: Point) {
        if self.origin.is_some() {
            self.current = Some(canvas);
        }
    }

    /// The rectangle dragged so far, normalized, in canvas coordinates.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        match (self.origin, self.current) {
            (Some(a), Some(b)) => Some(Rect::from_corners(a, b)),
            _ => None,
        }
    }

    /// Finish the drag and resolve it against the data axes.
    ///
    /// Canvas corners are pushed back through the viewport transform and
    /// the base scales, snapped to whole buckets and clamped to the axis
    /// bounds. A degenerate (zero-area) drag yields no selection. The
    /// brush disarms either way.
    pub fn finish(
        &mut self,
        transform: &ViewportTransform,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
        data: &HeatmapData,
    ) -> Option<SelectionRange> {
        let rect = self.rect();
        self.set_enabled(false);
        let rect = rect?;
        if rect.area() <= 0.0 {
            return None;
        }

        let t0 = snap(x_scale.invert(transform.invert_x(rect.x)), data.time_buckets());
        let t1 = snap(
            x_scale.invert(transform.invert_x(rect.x + rect.width)),
            data.time_buckets(),
        );
        let k0 = snap(y_scale.invert(transform.invert_y(rect.y)), data.key_buckets());
        let k1 = snap(
            y_scale.invert(transform.invert_y(rect.y + rect.height)),
            data.key_buckets(),
        );

        Some(SelectionRange {
            start_time: data.time_axis[t0],
            end_time: data.time_axis[t1],
            start_key: data.key_axis[k0].key.clone(),
            end_key: data.key_axis[k1].key.clone(),
        })
    }
}

/// Round a domain coordinate to the nearest axis boundary, clamped so the
/// result always indexes into an axis of `buckets + 1` entries.
fn snap(domain: f32, buckets: usize) -> usize {
    let idx = domain.round();
    if idx < 0.0 {
        return 0;
    }
    (idx as usize).min(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_data;

    fn scales(data: &HeatmapData) -> (LinearScale, LinearScale) {
        let x = LinearScale::new((0.0, data.time_buckets() as f32), (0.0, 100.0)).unwrap();
        let y = LinearScale::new((0.0, data.key_buckets() as f32), (0.0, 90.0)).unwrap();
        (x, y)
    }

    #[test]
    fn test_disarmed_drags_ignored() {
        let mut brush = BrushController::new();
        brush.begin(Point::new(10.0, 10.0));
        brush.drag_to(Point::new(50.0, 50.0));
        assert!(brush.rect().is_none());
    }

    #[test]
    fn test_rect_normalized_from_any_corner() {
        let mut brush = BrushController::new();
        brush.set_enabled(true);
        brush.begin(Point::new(50.0, 60.0));
        brush.drag_to(Point::new(10.0, 20.0));
        let rect = brush.rect().unwrap();
        assert_eq!((rect.x, rect.y), (10.0, 20.0));
        assert_eq!((rect.width, rect.height), (40.0, 40.0));
    }

    #[test]
    fn test_finish_resolves_buckets_at_identity() {
        let data = sample_data(4, 3);
        let (x, y) = scales(&data);
        let mut brush = BrushController::new();
        brush.set_enabled(true);
        // Buckets are 25px wide and 30px tall; drag covers time buckets
        // 1..3 and key buckets 0..2.
        brush.begin(Point::new(25.0, 0.0));
        brush.drag_to(Point::new(75.0, 60.0));
        let sel = brush
            .finish(&ViewportTransform::default(), &x, &y, &data)
            .unwrap();

        assert_eq!(sel.start_time, data.time_axis[1]);
        assert_eq!(sel.end_time, data.time_axis[3]);
        assert_eq!(sel.start_key, data.key_axis[0].key);
        assert_eq!(sel.end_key, data.key_axis[2].key);
        assert!(!brush.is_enabled());
    }

    #[test]
    fn test_finish_under_zoom_inverts_transform() {
        let data = sample_data(4, 3);
        let (x, y) = scales(&data);
        // 2x zoom anchored at the origin: canvas 50..100 shows domain 1..2
        let transform = ViewportTransform { x: 0.0, y: 0.0, k: 2.0 };
        let mut brush = BrushController::new();
        brush.set_enabled(true);
        brush.begin(Point::new(50.0, 0.0));
        brush.drag_to(Point::new(100.0, 60.0));
        let sel = brush.finish(&transform, &x, &y, &data).unwrap();

        assert_eq!(sel.start_time, data.time_axis[1]);
        assert_eq!(sel.end_time, data.time_axis[2]);
        assert_eq!(sel.start_key, data.key_axis[0].key);
        assert_eq!(sel.end_key, data.key_axis[1].key);
    }

    #[test]
    fn test_zero_area_drag_yields_nothing() {
        let data = sample_data(4, 3);
        let (x, y) = scales(&data);
        let mut brush = BrushController::new();
        brush.set_enabled(true);
        brush.begin(Point::new(30.0, 30.0));
        assert!(brush
            .finish(&ViewportTransform::default(), &x, &y, &data)
            .is_none());
        assert!(!brush.is_enabled());
    }

    #[test]
    fn test_overshooting_drag_clamped_to_axis() {
        let data = sample_data(4, 3);
        let (x, y) = scales(&data);
        let mut brush = BrushController::new();
        brush.set_enabled(true);
        brush.begin(Point::new(-40.0, -20.0));
        brush.drag_to(Point::new(400.0, 300.0));
        let sel = brush
            .finish(&ViewportTransform::default(), &x, &y, &data)
            .unwrap();

        assert_eq!(sel.start_time, data.time_axis[0]);
        assert_eq!(sel.end_time, *data.time_axis.last().unwrap());
        assert_eq!(sel.end_key, data.key_axis.last().unwrap().key);
    }

    #[test]
    fn test_disarming_discards_gesture() {
        let mut brush = BrushController::new();
        brush.set_enabled(true);
        brush.begin(Point::new(10.0, 10.0));
        brush.set_enabled(false);
        assert!(brush.rect().is_none());
    }
}
