//! Viewport zoom/pan transform and its panning constraints.
//!
//! The transform is the affine map `screen = canvas * k + t` shared by
//! every renderer and inverse mapper. Scale is clamped to `[1, 128]`. Two
//! translate constraints apply: an elastic one while a drag is in progress
//! (overshoot is pulled back by a bounce ratio so dragging feels
//! continuous) and a hard one at rest (the visible window never leaves the
//! data extent; an axis wider than the data is centered instead).
//!
//! Each engine instance owns exactly one transform; nothing here is shared
//! or global.

use crate::geometry::Point;
use crate::scale::LinearScale;

/// Minimum zoom scale (fully zoomed out).
pub const MIN_SCALE: f32 = 1.0;

/// Maximum zoom scale.
pub const MAX_SCALE: f32 = 128.0;

/// Fraction of drag overshoot pulled back by the elastic constraint.
const BOUNCE_RATIO: f32 = 0.8;

/// Affine zoom/pan transform: `apply(p) = p * k + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Horizontal translate, canvas pixels.
    pub x: f32,
    /// Vertical translate, canvas pixels.
    pub y: f32,
    /// Zoom scale, within `[MIN_SCALE, MAX_SCALE]`.
    pub k: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewportTransform {
    /// The identity transform (no zoom, no pan).
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }

    /// Map a canvas x coordinate into screen space.
    #[must_use]
    pub fn apply_x(&self, x: f32) -> f32 {
        x * self.k + self.x
    }

    /// Map a canvas y coordinate into screen space.
    #[must_use]
    pub fn apply_y(&self, y: f32) -> f32 {
        y * self.k + self.y
    }

    /// Map a screen x coordinate back into canvas space.
    #[must_use]
    pub fn invert_x(&self, x: f32) -> f32 {
        (x - self.x) / self.k
    }

    /// Map a screen y coordinate back into canvas space.
    #[must_use]
    pub fn invert_y(&self, y: f32) -> f32 {
        (y - self.y) / self.k
    }

    /// Map a screen point back into canvas space.
    #[must_use]
    pub fn invert(&self, p: Point) -> Point {
        Point::new(self.invert_x(p.x), self.invert_y(p.y))
    }

    /// Derive the screen-space scale from a canvas-space scale along x.
    ///
    /// The result maps the same domain, with its range pushed through this
    /// transform, so renderers and inverse mappers stay pixel-consistent.
    #[must_use]
    pub fn rescale_x(&self, scale: &LinearScale) -> LinearScale {
        let (r0, r1) = scale.range();
        scale.with_range((self.apply_x(r0), self.apply_x(r1)))
    }

    /// Derive the screen-space scale from a canvas-space scale along y.
    #[must_use]
    pub fn rescale_y(&self, scale: &LinearScale) -> LinearScale {
        let (r0, r1) = scale.range();
        scale.with_range((self.apply_y(r0), self.apply_y(r1)))
    }

    /// Scale by `factor` about a screen-space pivot, clamping the resulting
    /// scale to `[MIN_SCALE, MAX_SCALE]`. The pivot keeps pointing at the
    /// same canvas location.
    #[must_use]
    pub fn zoom_by(&self, factor: f32, pivot: Point) -> Self {
        let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = k / self.k;
        Self {
            x: pivot.x - (pivot.x - self.x) * ratio,
            y: pivot.y - (pivot.y - self.y) * ratio,
            k,
        }
    }

    /// Translate by a screen-space delta.
    #[must_use]
    pub fn pan_by(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Elastic translate constraint, applied continuously during a drag.
    ///
    /// Overshoot past either edge is pulled back by the bounce ratio in
    /// proportion to the overshoot; translate is floored to whole pixels.
    #[must_use]
    pub fn constrain_elastic(&self, width: f32, height: f32) -> Self {
        let drag_left = self.apply_x(0.0).max(0.0);
        let drag_right = (width - self.apply_x(width)).max(0.0);
        let drag_top = self.apply_y(0.0).max(0.0);
        let drag_bottom = (height - self.apply_y(height)).max(0.0);
        Self {
            x: (self.x - (drag_left - drag_right) * BOUNCE_RATIO).floor(),
            y: (self.y - (drag_top - drag_bottom) * BOUNCE_RATIO).floor(),
            k: self.k,
        }
    }

    /// Hard translate constraint, applied at gesture end and at rest.
    ///
    /// Re-derives the translate so the visible canvas window stays inside
    /// `[0, width] x [0, height]`; if the zoomed extent is wider than the
    /// data extent on an axis, that axis is centered instead.
    #[must_use]
    pub fn constrain_hard(&self, width: f32, height: f32) -> Self {
        let dx0 = self.invert_x(0.0);
        let dx1 = self.invert_x(width) - width;
        let dy0 = self.invert_y(0.0);
        let dy1 = self.invert_y(height) - height;

        let shift = |d0: f32, d1: f32| {
            if d1 > d0 {
                (d0 + d1) / 2.0
            } else if d0 < 0.0 {
                d0
            } else if d1 > 0.0 {
                d1
            } else {
                0.0
            }
        };

        Self {
            x: self.x + self.k * shift(dx0, dx1),
            y: self.y + self.k * shift(dy0, dy1),
            k: self.k,
        }
    }

    /// Re-base the transform after a container resize.
    ///
    /// Translate components scale by the new/old canvas ratio per axis so
    /// the logical viewport is preserved; scale is unchanged.
    #[must_use]
    pub fn resized(&self, old: (f32, f32), new: (f32, f32)) -> Self {
        if old.0 <= 0.0 || old.1 <= 0.0 {
            return *self;
        }
        Self {
            x: self.x * new.0 / old.0,
            y: self.y * new.1 / old.1,
            k: self.k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_round_trip() {
        let t = ViewportTransform::identity();
        assert_relative_eq!(t.apply_x(42.0), 42.0);
        assert_relative_eq!(t.invert_y(17.0), 17.0);
    }

    #[test]
    fn test_apply_invert_inverse() {
        let t = ViewportTransform {
            x: -120.0,
            y: 35.0,
            k: 4.0,
        };
        assert_relative_eq!(t.invert_x(t.apply_x(13.5)), 13.5, epsilon = 1e-4);
        assert_relative_eq!(t.invert_y(t.apply_y(-2.0)), -2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zoom_by_clamps_scale() {
        let mut t = ViewportTransform::identity();
        for _ in 0..20 {
            t = t.zoom_by(3.0, Point::ORIGIN);
        }
        assert_relative_eq!(t.k, MAX_SCALE);

        for _ in 0..40 {
            t = t.zoom_by(0.1, Point::ORIGIN);
        }
        assert_relative_eq!(t.k, MIN_SCALE);
    }

    #[test]
    fn test_zoom_preserves_pivot() {
        let t = ViewportTransform {
            x: -50.0,
            y: -10.0,
            k: 2.0,
        };
        let pivot = Point::new(80.0, 60.0);
        let canvas_at_pivot = t.invert(pivot);
        let zoomed = t.zoom_by(2.0, pivot);
        let after = zoomed.invert(pivot);
        assert_relative_eq!(after.x, canvas_at_pivot.x, epsilon = 1e-3);
        assert_relative_eq!(after.y, canvas_at_pivot.y, epsilon = 1e-3);
    }

    #[test]
    fn test_hard_constraint_clamps_left_overshoot() {
        // Dragged right past the left data edge
        let t = ViewportTransform {
            x: 10.0,
            y: 0.0,
            k: 2.0,
        };
        let c = t.constrain_hard(100.0, 100.0);
        assert_relative_eq!(c.invert_x(0.0), 0.0, epsilon = 1e-4);
        assert_relative_eq!(c.k, 2.0);
    }

    #[test]
    fn test_hard_constraint_clamps_right_overshoot() {
        let t = ViewportTransform {
            x: -150.0,
            y: 0.0,
            k: 2.0,
        };
        let c = t.constrain_hard(100.0, 100.0);
        assert_relative_eq!(c.invert_x(100.0), 100.0, epsilon = 1e-4);
    }

    #[test]
    fn test_hard_constraint_noop_inside() {
        let t = ViewportTransform {
            x: -50.0,
            y: -30.0,
            k: 2.0,
        };
        let c = t.constrain_hard(100.0, 100.0);
        assert_eq!(c, t);
    }

    #[test]
    fn test_elastic_pulls_back_overshoot() {
        let t = ViewportTransform {
            x: 100.0,
            y: 0.0,
            k: 2.0,
        };
        let c = t.constrain_elastic(200.0, 200.0);
        // Overshoot of 100 pulled back by 0.8
        assert_relative_eq!(c.x, 20.0);
        assert_relative_eq!(c.y, 0.0);
        assert_relative_eq!(c.k, 2.0);
    }

    #[test]
    fn test_elastic_noop_inside_bounds() {
        let t = ViewportTransform {
            x: -100.0,
            y: -50.0,
            k: 2.0,
        };
        let c = t.constrain_elastic(200.0, 200.0);
        assert_eq!(c, t);
    }

    #[test]
    fn test_resize_rebases_proportionally() {
        let t = ViewportTransform {
            x: -40.0,
            y: -25.0,
            k: 8.0,
        };
        let c = t.resized((100.0, 50.0), (200.0, 100.0));
        assert_relative_eq!(c.x, -80.0);
        assert_relative_eq!(c.y, -50.0);
        assert_relative_eq!(c.k, 8.0);
    }

    #[test]
    fn test_resize_from_zero_keeps_transform() {
        let t = ViewportTransform {
            x: -40.0,
            y: -25.0,
            k: 8.0,
        };
        assert_eq!(t.resized((0.0, 0.0), (200.0, 100.0)), t);
    }

    #[test]
    fn test_rescale_matches_apply() {
        let t = ViewportTransform {
            x: -30.0,
            y: 12.0,
            k: 3.0,
        };
        let scale = LinearScale::new((0.0, 10.0), (0.0, 400.0)).unwrap();
        let rescaled = t.rescale_x(&scale);
        for d in [0.0_f32, 2.5, 7.0, 10.0] {
            assert_relative_eq!(rescaled.scale(d), t.apply_x(scale.scale(d)), epsilon = 1e-3);
            assert_relative_eq!(
                rescaled.invert(t.apply_x(scale.scale(d))),
                d,
                epsilon = 1e-3
            );
        }
    }
}
