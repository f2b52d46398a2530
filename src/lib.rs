//! # Keymap-Viz
//!
//! Rendering and interaction engine for key-range traffic heatmaps.
//!
//! The engine turns a bucketed traffic matrix (time buckets by key-range
//! buckets, five metric channels) into an interactive picture: a
//! pre-rendered channel raster blitted under a constrained zoom/pan
//! viewport, hierarchical key labels, marginal histograms, a tooltip that
//! can be pinned to a cell, and a brush that resolves drags back to
//! timestamps and raw keys.
//!
//! Rendering is pure Rust into SIMD-aligned framebuffers; no windowing or
//! font stack is assumed. Each frame is rebuilt from scratch as a [`Scene`]
//! of pixel layers plus text data for the host to draw.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keymap_viz::prelude::*;
//!
//! let mut chart = HeatmapChart::new(1280, 720)?;
//! chart.set_data(snapshot)?;
//! chart.wheel_zoomed(2.0, Point::new(400.0, 300.0));
//! let scene = chart.render()?;
//! PngEncoder::write_to_file(&scene.heatmap, "heatmap.png")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialization for the data contract types
//!
//! [`Scene`]: chart::Scene

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and compositing helpers.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

// ============================================================================
// Engine Modules
// ============================================================================

/// Input data contract: axes, channels, validation.
pub mod data;

/// Value-to-color theming per channel dynamic range.
pub mod theme;

/// Pre-rendered channel buffer.
pub mod buffer;

/// Viewport zoom/pan transform and constraints.
pub mod viewport;

/// Label and histogram axis renderers.
pub mod axis;

/// Tooltip/cursor state machine.
pub mod tooltip;

/// Brush selection.
pub mod brush;

/// The chart engine and scene assembly.
pub mod chart;

/// Output encoders (PNG).
pub mod output;

/// Error types.
pub mod error;

mod util;

/// Commonly used types, re-exported.
pub mod prelude {
    pub use crate::brush::SelectionRange;
    pub use crate::chart::{HeatmapChart, Layout, Margins, Scene};
    pub use crate::color::Rgba;
    pub use crate::data::{Channel, ChannelSet, HeatmapData, KeyAxisEntry};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, Rect};
    pub use crate::output::PngEncoder;
    pub use crate::theme::ColorTheme;
    pub use crate::viewport::ViewportTransform;
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::data::{ChannelSet, HeatmapData, KeyAxisEntry, Matrix, LABEL_LEVELS};

    /// A valid snapshot with deterministic, channel-distinct cell values
    /// and a two-level label hierarchy.
    pub(crate) fn sample_data(time_buckets: usize, key_buckets: usize) -> HeatmapData {
        let matrix = |seed: usize| -> Matrix {
            (0..time_buckets)
                .map(|t| {
                    (0..key_buckets)
                        .map(|k| ((t * 31 + k * 7 + seed * 13) % 97) as f64)
                        .collect()
                })
                .collect()
        };

        let key_axis = (0..=key_buckets)
            .map(|k| {
                let mut labels: [Option<String>; LABEL_LEVELS] = Default::default();
                labels[0] = Some(format!("db{}", k / 2));
                labels[1] = Some(format!("table{k}"));
                KeyAxisEntry {
                    key: format!("7480000000000000{k:02x}"),
                    labels,
                }
            })
            .collect();

        HeatmapData {
            time_axis: (0..=time_buckets).map(|t| 1_700_000_000_000 + t as i64 * 60_000).collect(),
            key_axis,
            data: ChannelSet {
                integration: matrix(0),
                read_bytes: matrix(1),
                written_bytes: matrix(2),
                read_keys: matrix(3),
                written_keys: matrix(4),
            },
        }
    }
}
