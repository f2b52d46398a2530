//! The interactive heatmap engine: owns all state and orchestrates redraw.
//!
//! [`HeatmapChart`] holds the data snapshot, the pre-rendered channel
//! buffer, the viewport transform, the cursor state machine and the brush,
//! and exposes mutators and pointer entry points. Every mutation invalidates
//! whole cached stages (buffer, label groups, marginals); [`render`]
//! rebuilds a complete [`Scene`] from scratch each call, so a frame never
//! depends on what the previous frame drew.
//!
//! [`render`]: HeatmapChart::render

use crate::axis::histogram::{render_x_histogram, render_y_histogram, STRIP_DEPTH};
use crate::axis::label::{
    aggregate_labels, render_label_axis, DisplaySection, LabelSection, STRIP_WIDTH,
};
use crate::axis::FocusWindow;
use crate::brush::{BrushController, SelectionRange};
use crate::buffer::render_channel_buffer;
use crate::color::Rgba;
use crate::data::{Channel, HeatmapData, LABEL_LEVELS};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::scale::LinearScale;
use crate::theme::ColorTheme;
use crate::tooltip::{self, CursorState, TooltipContent, TooltipPlacement};
use crate::viewport::ViewportTransform;

/// Minimum screen distance between two time-axis ticks, pixels.
const MIN_TICK_SPACING: f32 = 80.0;

/// Hot cells (above a third of the channel maximum) get a glow overlay.
const HIGHLIGHT_DIVISOR: f64 = 3.0;
const HIGHLIGHT_ALPHA: u8 = 96;

/// Translucent gray brush selection fill.
const BRUSH_FILL: Rgba = Rgba::new(119, 119, 119, 77);

const CROSS_OUTER: Rgba = Rgba::rgb(17, 17, 17);
const CROSS_INNER: Rgba = Rgba::rgb(238, 238, 238);
const CROSS_ARM_LENGTH: u32 = 8;
const CROSS_ARM_WIDTH: u32 = 2;
const CROSS_CENTER_PAD: u32 = 3;
const CROSS_BORDER: u32 = 1;

/// Fixed margins around the plot canvas, pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    /// Above the plot.
    pub top: u32,
    /// Right of the plot (y histogram strip).
    pub right: u32,
    /// Below the plot (x histogram strip and time ticks).
    pub bottom: u32,
    /// Left of the plot (label axis strip).
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 25,
            right: 40,
            bottom: 70,
            left: 90,
        }
    }
}

/// Resolved plot geometry for one container size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// The surrounding margins.
    pub margins: Margins,
    /// Total container width, pixels.
    pub width: u32,
    /// Total container height, pixels.
    pub height: u32,
    /// Plot canvas width (container minus horizontal margins).
    pub canvas_width: u32,
    /// Plot canvas height (container minus vertical margins).
    pub canvas_height: u32,
}

impl Layout {
    /// Resolve a container size against the margins.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] when the margins leave no plot area.
    pub fn new(width: u32, height: u32, margins: Margins) -> Result<Self> {
        let canvas_width = width.saturating_sub(margins.left + margins.right);
        let canvas_height = height.saturating_sub(margins.top + margins.bottom);
        if canvas_width == 0 || canvas_height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            margins,
            width,
            height,
            canvas_width,
            canvas_height,
        })
    }
}

/// One labelled tick on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTick {
    /// Tick position in plot pixels, rounded.
    pub x: i32,
    /// The bucket boundary timestamp, unix milliseconds.
    pub timestamp: i64,
}

/// Tooltip layer of a rendered scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipOverlay {
    /// Clipped box placement in plot pixels.
    pub placement: TooltipPlacement,
    /// Values to lay out inside the box.
    pub content: TooltipContent,
}

/// One fully rendered frame, bottom layer first.
///
/// Pixel layers are framebuffers the host composites at the layout margins;
/// text layers (label sections, ticks, tooltip content) are data for the
/// host's text renderer.
#[derive(Debug)]
pub struct Scene {
    /// The plot canvas: blitted channel buffer, hot-cell glow, brush
    /// rectangle and pinned-cursor cross.
    pub heatmap: Framebuffer,
    /// Time marginal strip, drawn below the plot.
    pub x_histogram: Framebuffer,
    /// Key marginal strip, drawn right of the plot.
    pub y_histogram: Framebuffer,
    /// Label axis strip, drawn left of the plot.
    pub label_axis: Framebuffer,
    /// Scaled label sections, per hierarchy level, with fitted text.
    pub label_sections: [Vec<DisplaySection>; LABEL_LEVELS],
    /// Ticks to label along the bottom edge.
    pub time_ticks: Vec<TimeTick>,
    /// In-progress brush rectangle, plot pixels.
    pub brush_rect: Option<Rect>,
    /// Tooltip box and content, topmost except for the cross.
    pub tooltip: Option<TooltipOverlay>,
}

/// Selection callback, fired when a brush gesture resolves.
pub type SelectionCallback = Box<dyn FnMut(&SelectionRange)>;

/// Viewport callback, fired when a gesture or reset settles the transform.
pub type ViewportCallback = Box<dyn FnMut(&ViewportTransform)>;

/// Caches derived from one (data, channel, brightness) combination.
struct ChannelCaches {
    theme: ColorTheme,
    buffer: Framebuffer,
    time_marginals: Vec<f32>,
    key_marginals: Vec<f32>,
}

/// The heatmap engine. One instance per chart; no shared state.
pub struct HeatmapChart {
    layout: Layout,
    channel: Channel,
    brightness: f64,
    data: Option<HeatmapData>,
    caches: Option<ChannelCaches>,
    label_groups: [Vec<LabelSection>; LABEL_LEVELS],
    x_scale: Option<LinearScale>,
    y_scale: Option<LinearScale>,
    transform: ViewportTransform,
    cursor: CursorState,
    brush: BrushController,
    pan_anchor: Option<Point>,
    on_selection: Option<SelectionCallback>,
    on_viewport_change: Option<ViewportCallback>,
}

impl HeatmapChart {
    /// Create an empty chart for a container size with default margins.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] when the margins leave no plot area.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            layout: Layout::new(width, height, Margins::default())?,
            channel: Channel::default(),
            brightness: 1.0,
            data: None,
            caches: None,
            label_groups: std::array::from_fn(|_| Vec::new()),
            x_scale: None,
            y_scale: None,
            transform: ViewportTransform::identity(),
            cursor: CursorState::Hidden,
            brush: BrushController::new(),
            pan_anchor: None,
            on_selection: None,
            on_viewport_change: None,
        })
    }

    /// The resolved plot geometry.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The current viewport transform.
    #[must_use]
    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    /// The active channel.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Register the selection callback.
    pub fn on_selection(&mut self, callback: impl FnMut(&SelectionRange) + 'static) {
        self.on_selection = Some(Box::new(callback));
    }

    /// Register the viewport-change callback.
    pub fn on_viewport_change(&mut self, callback: impl FnMut(&ViewportTransform) + 'static) {
        self.on_viewport_change = Some(Box::new(callback));
    }

    /// Replace the data snapshot wholesale.
    ///
    /// The snapshot is validated first; on error the previous state is left
    /// untouched. On success every derived cache (channel buffer, label
    /// groups, marginals, scales) is rebuilt and the ephemeral cursor state
    /// is cleared. The viewport transform is kept, re-constrained against
    /// the new extent.
    ///
    /// # Errors
    ///
    /// Validation errors from [`HeatmapData::validate`], or framebuffer
    /// errors when rebuilding the channel buffer.
    pub fn set_data(&mut self, data: HeatmapData) -> Result<()> {
        data.validate()?;
        let caches = self.build_caches(&data)?;

        self.x_scale = Some(LinearScale::new(
            (0.0, data.time_buckets() as f32),
            (0.0, self.layout.canvas_width as f32),
        )?);
        self.y_scale = Some(LinearScale::new(
            (0.0, data.key_buckets() as f32),
            (0.0, self.layout.canvas_height as f32),
        )?);
        self.label_groups = aggregate_labels(&data.key_axis);
        self.caches = Some(caches);
        self.data = Some(data);
        self.cursor = CursorState::Hidden;
        self.transform = self.transform.constrain_hard(
            self.layout.canvas_width as f32,
            self.layout.canvas_height as f32,
        );
        Ok(())
    }

    /// Switch the displayed channel, rebuilding the channel buffer.
    ///
    /// # Errors
    ///
    /// Framebuffer errors when rebuilding the channel buffer.
    pub fn set_channel(&mut self, channel: Channel) -> Result<()> {
        if channel == self.channel {
            return Ok(());
        }
        self.channel = channel;
        self.cursor = CursorState::Hidden;
        self.rebuild_channel_caches()
    }

    /// Adjust the brightness multiplier, rebuilding the channel buffer.
    ///
    /// # Errors
    ///
    /// Framebuffer errors when rebuilding the channel buffer.
    pub fn set_brightness(&mut self, brightness: f64) -> Result<()> {
        self.brightness = brightness.max(0.0);
        self.rebuild_channel_caches()
    }

    /// Arm or disarm the brush. While armed, zoom and pan gestures are
    /// suspended and drags draw the selection rectangle instead.
    pub fn set_brush_mode(&mut self, enabled: bool) {
        self.brush.set_enabled(enabled);
    }

    /// Whether the brush is armed.
    #[must_use]
    pub fn brush_mode(&self) -> bool {
        self.brush.is_enabled()
    }

    /// Reset the viewport to identity and notify the viewport callback.
    pub fn reset_zoom(&mut self) {
        self.transform = ViewportTransform::identity();
        self.notify_viewport();
    }

    /// Resize the container, preserving the logical viewport.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] when the new size leaves no plot area.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let old = (
            self.layout.canvas_width as f32,
            self.layout.canvas_height as f32,
        );
        let layout = Layout::new(width, height, self.layout.margins)?;
        let new = (layout.canvas_width as f32, layout.canvas_height as f32);
        self.layout = layout;
        self.transform = self.transform.resized(old, new).constrain_hard(new.0, new.1);

        if let Some(data) = &self.data {
            self.x_scale = Some(LinearScale::new(
                (0.0, data.time_buckets() as f32),
                (0.0, new.0),
            )?);
            self.y_scale = Some(LinearScale::new(
                (0.0, data.key_buckets() as f32),
                (0.0, new.1),
            )?);
        }
        self.notify_viewport();
        Ok(())
    }

    /// Wheel zoom about a plot-pixel pivot. Ignored while the brush is
    /// armed. The transform settles through the hard constraint.
    pub fn wheel_zoomed(&mut self, factor: f32, pivot: Point) {
        if self.brush.is_enabled() {
            return;
        }
        let (w, h) = self.canvas_size();
        self.transform = self.transform.zoom_by(factor, pivot).constrain_hard(w, h);
        self.notify_viewport();
    }

    /// Start a drag at a plot pixel: a brush drag while armed, a pan
    /// otherwise.
    pub fn begin_drag(&mut self, p: Point) {
        if self.brush.is_enabled() {
            self.brush.begin(p);
        } else {
            self.pan_anchor = Some(p);
        }
    }

    /// Continue a drag. Pans apply the elastic constraint continuously.
    pub fn drag_to(&mut self, p: Point) {
        if self.brush.is_enabled() {
            self.brush.drag_to(p);
            return;
        }
        if let Some(anchor) = self.pan_anchor {
            let (w, h) = self.canvas_size();
            self.transform = self
                .transform
                .pan_by(p.x - anchor.x, p.y - anchor.y)
                .constrain_elastic(w, h);
            self.pan_anchor = Some(p);
        }
    }

    /// End a drag: a brush resolves to a selection and fires the selection
    /// callback, a pan settles through the hard constraint and fires the
    /// viewport callback.
    pub fn end_drag(&mut self) {
        if self.brush.is_enabled() {
            let selection = match (&self.data, &self.x_scale, &self.y_scale) {
                (Some(data), Some(x), Some(y)) => self.brush.finish(&self.transform, x, y, data),
                _ => {
                    self.brush.set_enabled(false);
                    None
                }
            };
            if let Some(selection) = selection {
                if let Some(mut callback) = self.on_selection.take() {
                    callback(&selection);
                    self.on_selection = Some(callback);
                }
            }
            return;
        }
        if self.pan_anchor.take().is_some() {
            let (w, h) = self.canvas_size();
            self.transform = self.transform.constrain_hard(w, h);
            self.notify_viewport();
        }
    }

    /// Pointer moved over the plot at a plot pixel, or `None` when outside
    /// the plot area.
    pub fn pointer_moved(&mut self, p: Option<Point>) {
        self.cursor.pointer_moved(p.and_then(|p| self.to_domain(p)));
    }

    /// Pointer left the chart entirely.
    pub fn pointer_left(&mut self) {
        self.cursor.pointer_left();
    }

    /// Click at a plot pixel (`None` when outside the plot area): pins or
    /// un-pins the tooltip. Ignored while the brush is armed.
    pub fn clicked(&mut self, p: Option<Point>) {
        if !self.brush.is_enabled() {
            self.cursor.clicked(p.and_then(|p| self.to_domain(p)));
        }
    }

    /// Whether the tooltip currently intercepts pointer events.
    #[must_use]
    pub fn tooltip_accepts_pointer(&self) -> bool {
        self.cursor.accepts_pointer()
    }

    /// Render one complete frame.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyData`] before any snapshot has been set, or
    /// framebuffer errors for degenerate plot sizes.
    pub fn render(&self) -> Result<Scene> {
        let (data, caches, x_scale, y_scale) = match (
            &self.data,
            &self.caches,
            &self.x_scale,
            &self.y_scale,
        ) {
            (Some(d), Some(c), Some(x), Some(y)) => (d, c, x, y),
            _ => return Err(Error::EmptyData),
        };

        let (w, h) = (self.layout.canvas_width, self.layout.canvas_height);
        let x_rescale = self.transform.rescale_x(x_scale);
        let y_rescale = self.transform.rescale_y(y_scale);
        let focus = self.cursor.position().map(|p| FocusWindow::at_point(p.x, p.y));

        let mut heatmap = Framebuffer::new(w, h)?;
        heatmap.clear(Rgba::BLACK);
        self.blit_visible_window(&mut heatmap, &caches.buffer, x_scale, y_scale);
        self.overlay_hot_cells(&mut heatmap, data, caches, &x_rescale, &y_rescale);

        let mut x_histogram = Framebuffer::new(w, STRIP_DEPTH)?;
        render_x_histogram(
            &mut x_histogram,
            &caches.time_marginals,
            focus.map(|f| f.x_domain),
            &x_rescale,
        );
        let mut y_histogram = Framebuffer::new(STRIP_DEPTH, h)?;
        render_y_histogram(
            &mut y_histogram,
            &caches.key_marginals,
            focus.map(|f| f.y_domain),
            &y_rescale,
        );

        let mut label_axis = Framebuffer::new(STRIP_WIDTH, h)?;
        let label_sections = render_label_axis(
            &mut label_axis,
            &self.label_groups,
            focus.map(|f| f.y_domain),
            &y_rescale,
        );

        let brush_rect = self.brush.rect();
        if let Some(rect) = brush_rect {
            heatmap.blend_rect(
                rect.x.max(0.0) as u32,
                rect.y.max(0.0) as u32,
                rect.width as u32,
                rect.height as u32,
                BRUSH_FILL,
            );
        }

        let tooltip = self.tooltip_overlay(data, caches, &x_rescale, &y_rescale);

        if let CursorState::Pinned(p) = self.cursor {
            draw_cross(
                &mut heatmap,
                x_rescale.scale(p.x).round() as i32,
                y_rescale.scale(p.y).round() as i32,
            );
        }

        Ok(Scene {
            heatmap,
            x_histogram,
            y_histogram,
            label_axis,
            label_sections,
            time_ticks: time_ticks(&data.time_axis, &x_rescale, w as f32),
            brush_rect,
            tooltip,
        })
    }

    fn canvas_size(&self) -> (f32, f32) {
        (
            self.layout.canvas_width as f32,
            self.layout.canvas_height as f32,
        )
    }

    /// Map a plot pixel to domain coordinates, `None` outside the plot.
    fn to_domain(&self, p: Point) -> Option<Point> {
        let (x_scale, y_scale) = (self.x_scale.as_ref()?, self.y_scale.as_ref()?);
        let (w, h) = self.canvas_size();
        if p.x < 0.0 || p.y < 0.0 || p.x >= w || p.y >= h {
            return None;
        }
        let canvas = self.transform.invert(p);
        Some(Point::new(
            x_scale.invert(canvas.x),
            y_scale.invert(canvas.y),
        ))
    }

    fn build_caches(&self, data: &HeatmapData) -> Result<ChannelCaches> {
        let theme = ColorTheme::new(data.channel_max(self.channel), self.brightness);
        let buffer = render_channel_buffer(data.data.get(self.channel), &theme)?;
        Ok(ChannelCaches {
            theme,
            buffer,
            time_marginals: data.time_marginals(self.channel),
            key_marginals: data.key_marginals(self.channel),
        })
    }

    fn rebuild_channel_caches(&mut self) -> Result<()> {
        if let Some(data) = self.data.take() {
            let caches = self.build_caches(&data);
            self.data = Some(data);
            self.caches = Some(caches?);
        }
        Ok(())
    }

    /// Blit the visible domain window of the channel buffer over the whole
    /// plot. The source rectangle is the plot extent pushed back through the
    /// viewport transform and the base scales; during an elastic overshoot
    /// it hangs off the buffer and the uncovered strip stays background.
    fn blit_visible_window(
        &self,
        heatmap: &mut Framebuffer,
        buffer: &Framebuffer,
        x_scale: &LinearScale,
        y_scale: &LinearScale,
    ) {
        let (w, h) = self.canvas_size();
        let src_x = x_scale.invert(self.transform.invert_x(0.0));
        let src_y = y_scale.invert(self.transform.invert_y(0.0));
        let src_w = x_scale.invert(self.transform.invert_x(w)) - src_x;
        let src_h = y_scale.invert(self.transform.invert_y(h)) - src_y;
        heatmap.blit_scaled(
            buffer,
            src_x,
            src_y,
            src_w,
            src_h,
            0,
            0,
            self.layout.canvas_width,
            self.layout.canvas_height,
        );
    }

    /// Glow pass: cells above a third of the channel maximum are re-blended
    /// slightly larger than their blitted footprint, with the pad growing as
    /// the zoom deepens.
    fn overlay_hot_cells(
        &self,
        heatmap: &mut Framebuffer,
        data: &HeatmapData,
        caches: &ChannelCaches,
        x_rescale: &LinearScale,
        y_rescale: &LinearScale,
    ) {
        let max = caches.theme.max_value();
        if max <= 0.0 {
            return;
        }
        let threshold = max / HIGHLIGHT_DIVISOR;
        let pad = 2.0 + 2.0 * (1.0 - 1.0 / self.transform.k);
        let (w, h) = self.canvas_size();

        for (t, row) in data.data.get(self.channel).iter().enumerate() {
            let x0 = x_rescale.scale(t as f32) - pad;
            let x1 = x_rescale.scale(t as f32 + 1.0) + pad;
            if x1 < 0.0 || x0 > w {
                continue;
            }
            for (k, &value) in row.iter().enumerate() {
                if value <= threshold {
                    continue;
                }
                let y0 = y_rescale.scale(k as f32) - pad;
                let y1 = y_rescale.scale(k as f32 + 1.0) + pad;
                if y1 < 0.0 || y0 > h {
                    continue;
                }
                heatmap.blend_rect(
                    x0.max(0.0) as u32,
                    y0.max(0.0) as u32,
                    (x1 - x0.max(0.0)).max(0.0) as u32,
                    (y1 - y0.max(0.0)).max(0.0) as u32,
                    caches.theme.background(value).with_alpha(HIGHLIGHT_ALPHA),
                );
            }
        }
    }

    fn tooltip_overlay(
        &self,
        data: &HeatmapData,
        caches: &ChannelCaches,
        x_rescale: &LinearScale,
        y_rescale: &LinearScale,
    ) -> Option<TooltipOverlay> {
        let (w, h) = self.canvas_size();
        let placement = tooltip::placement(&self.cursor, w, h, x_rescale, y_rescale)?;
        let content = tooltip::content(&self.cursor, data, self.channel, &caches.theme)?;
        Some(TooltipOverlay { placement, content })
    }

    fn notify_viewport(&mut self) {
        if let Some(mut callback) = self.on_viewport_change.take() {
            callback(&self.transform);
            self.on_viewport_change = Some(callback);
        }
    }
}

/// Pick visible bucket boundaries as ticks, stepped so adjacent ticks stay
/// at least [`MIN_TICK_SPACING`] apart on screen.
fn time_ticks(time_axis: &[i64], x_rescale: &LinearScale, width: f32) -> Vec<TimeTick> {
    let bucket_px = x_rescale.scale(1.0) - x_rescale.scale(0.0);
    if bucket_px <= 0.0 {
        return Vec::new();
    }
    let step = (MIN_TICK_SPACING / bucket_px).ceil().max(1.0) as usize;

    time_axis
        .iter()
        .enumerate()
        .step_by(step)
        .filter_map(|(idx, &timestamp)| {
            let x = x_rescale.scale(idx as f32);
            (x >= 0.0 && x <= width).then(|| TimeTick {
                x: x.round() as i32,
                timestamp,
            })
        })
        .collect()
}

/// Draw the pinned-cursor cross: four arms around a clear center, each a
/// light core inside a dark border.
fn draw_cross(fb: &mut Framebuffer, cx: i32, cy: i32) {
    let arm = |fb: &mut Framebuffer, x: i32, y: i32, w: u32, h: u32| {
        let b = CROSS_BORDER as i32;
        fill_signed(
            fb,
            x - b,
            y - b,
            w + 2 * CROSS_BORDER,
            h + 2 * CROSS_BORDER,
            CROSS_OUTER,
        );
        fill_signed(fb, x, y, w, h, CROSS_INNER);
    };

    let pad = CROSS_CENTER_PAD as i32;
    let len = CROSS_ARM_LENGTH;
    let wid = CROSS_ARM_WIDTH;
    let half = (wid / 2) as i32;

    // Left, right, up, down
    arm(fb, cx - pad - len as i32, cy - half, len, wid);
    arm(fb, cx + pad, cy - half, len, wid);
    arm(fb, cx - half, cy - pad - len as i32, wid, len);
    arm(fb, cx - half, cy + pad, wid, len);
}

/// `fill_rect` accepting signed coordinates, clipping at the origin.
fn fill_signed(fb: &mut Framebuffer, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
    let clip_x = (-x).max(0) as u32;
    let clip_y = (-y).max(0) as u32;
    if clip_x >= w || clip_y >= h {
        return;
    }
    fb.fill_rect(
        x.max(0) as u32,
        y.max(0) as u32,
        w - clip_x,
        h - clip_y,
        color,
    );
}
