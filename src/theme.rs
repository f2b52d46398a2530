//! Value-to-color mapping for one channel's dynamic range.
//!
//! A [`ColorTheme`] is derived once per (data, channel, brightness) change
//! and shared by the pre-rendered buffer and the live tooltip, so both
//! always agree on the color of a value.

use crate::color::Rgba;
use crate::scale::ColorScale;

/// Background color threshold above which labels switch to a dark color.
const LABEL_LUMINANCE_THRESHOLD: f32 = 150.0;

/// Dark label color used over bright backgrounds.
const LABEL_DARK: Rgba = Rgba::rgb(51, 51, 51);

/// Light label color used over dark backgrounds.
const LABEL_LIGHT: Rgba = Rgba::rgb(238, 238, 238);

/// Deterministic value-to-color mapping over a `[0, max_value]` domain.
///
/// Both mapping functions are pure: the same `(max_value, brightness,
/// value)` triple always yields the same color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTheme {
    max_value: f64,
    brightness: f64,
    /// `None` when the dynamic range is zero; every value then maps to the
    /// flat base color instead of dividing by zero.
    scale: Option<ColorScale>,
}

impl ColorTheme {
    /// Derive a theme for a channel whose maximum cell value is
    /// `max_value`, with a brightness multiplier applied to values before
    /// palette lookup.
    #[must_use]
    pub fn new(max_value: f64, brightness: f64) -> Self {
        let scale = if max_value > 0.0 {
            ColorScale::heat((0.0, max_value as f32))
        } else {
            None
        };
        Self {
            max_value,
            brightness: brightness.max(0.0),
            scale,
        }
    }

    /// The dynamic range this theme was derived from.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Background color for a cell value.
    #[must_use]
    pub fn background(&self, value: f64) -> Rgba {
        match &self.scale {
            Some(scale) => scale.scale((value * self.brightness) as f32),
            None => Rgba::BLACK,
        }
    }

    /// A label color contrasting with `background(value)`.
    #[must_use]
    pub fn label(&self, value: f64) -> Rgba {
        if self.background(value).luminance() > LABEL_LUMINANCE_THRESHOLD {
            LABEL_DARK
        } else {
            LABEL_LIGHT
        }
    }
}
