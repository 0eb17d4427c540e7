use std::fmt;

pub const DEFAULT_ITERATIONS: i32 = 200;
pub const DEFAULT_ZOOM: f64 = 100.0;
pub const DEFAULT_FREQUENCY: f32 = 30.0;

/// Iteration change per key press.
pub const ITERATION_STEP: i32 = 50;

/// Iteration change per scroll line while the modifier key is held.
const SCROLL_ITERATION_STEP: i32 = 5;

/// Lower bound of the per-event scroll zoom factor, keeps `zoom` positive
/// for arbitrarily large negative deltas.
pub const MIN_SCROLL_ZOOM_FACTOR: f64 = 0.5;

/// Bounds of `zoom`. Every zoom change saturates here, so the value stays
/// finite and strictly positive.
pub const MIN_ZOOM: f64 = f64::MIN_POSITIVE;
pub const MAX_ZOOM: f64 = f64::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CycleDirection {
    #[default]
    Ascending,
    Descending,
}

/// The mutable view state shared by input handling, the animator and the
/// renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParameters {
    pub iterations: i32,
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub frequency: f32,
    pub uv_offset: f32,
    pub auto_zoom: bool,
    pub animate_frequency: bool,
    pub animate_uv: bool,
    pub dragging: bool,
    pub direction: CycleDirection,
    last_cursor: (f64, f64),
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            zoom: DEFAULT_ZOOM,
            offset_x: 0.0,
            offset_y: 0.0,
            frequency: DEFAULT_FREQUENCY,
            uv_offset: 0.0,
            auto_zoom: false,
            animate_frequency: false,
            animate_uv: false,
            dragging: false,
            direction: CycleDirection::Ascending,
            last_cursor: (0.0, 0.0),
        }
    }
}

impl RenderParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the default view. An in-progress drag survives.
    pub fn reset(&mut self) {
        *self = Self {
            dragging: self.dragging,
            last_cursor: self.last_cursor,
            ..Self::default()
        };
    }

    pub fn zoom_in(&mut self) {
        self.scale_zoom(2.0);
    }

    pub fn zoom_out(&mut self) {
        self.scale_zoom(0.5);
    }

    /// Multiplies `zoom` by `factor`, saturating at `MIN_ZOOM`/`MAX_ZOOM`.
    pub fn scale_zoom(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Adds `delta` iterations, saturating at zero.
    pub fn add_iterations(&mut self, delta: i32) {
        self.iterations = self.iterations.saturating_add(delta).max(0);
    }

    pub fn toggle_auto_zoom(&mut self) {
        self.auto_zoom = !self.auto_zoom;
    }

    pub fn toggle_frequency_animation(&mut self) {
        self.animate_frequency = !self.animate_frequency;
    }

    pub fn toggle_uv_animation(&mut self) {
        self.animate_uv = !self.animate_uv;
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.dragging = true;
        self.last_cursor = (x, y);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Pans by the cursor movement since the last position, scaled into
    /// fractal-plane units. Screen y grows downwards, the plane's upwards.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if !self.dragging {
            return;
        }

        let (last_x, last_y) = self.last_cursor;
        self.offset_x += (x - last_x) / self.zoom;
        self.offset_y += (last_y - y) / self.zoom;
        self.last_cursor = (x, y);
    }

    /// Zoom step proportional to the current zoom, so scrolling feels
    /// uniform in log space.
    pub fn scroll_zoom(&mut self, delta_y: f64) {
        self.scale_zoom((1.0 + delta_y / 10.0).max(MIN_SCROLL_ZOOM_FACTOR));
    }

    pub fn scroll_iterations(&mut self, delta_y: f64) {
        let lines = delta_y.round() as i32;
        self.add_iterations(lines.saturating_mul(SCROLL_ITERATION_STEP));
    }
}

impl fmt::Display for RenderParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "iter = {}", self.iterations)?;
        writeln!(f, "zoom = {}", self.zoom)?;
        writeln!(f, "Offsets: x = {}; y = {}", self.offset_x, self.offset_y)?;
        writeln!(f, "Frequency = {}", self.frequency)?;
        writeln!(f, "UV Offset = {}", self.uv_offset)?;
        write!(
            f,
            "Animations: zoom = {}; frequency = {}; uv = {}",
            on_off(self.auto_zoom),
            on_off(self.animate_frequency),
            on_off(self.animate_uv)
        )
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_initial_view() {
        let params = RenderParameters::new();

        assert_eq!(params.iterations, 200);
        assert_eq!(params.zoom, 100.0);
        assert_eq!((params.offset_x, params.offset_y), (0.0, 0.0));
        assert_eq!(params.frequency, 30.0);
        assert_eq!(params.uv_offset, 0.0);
        assert!(!params.auto_zoom && !params.animate_frequency && !params.animate_uv);
        assert!(!params.dragging);
    }

    #[test]
    fn reset_keeps_drag_state() {
        let mut params = RenderParameters::new();
        params.begin_drag(10.0, 10.0);
        params.zoom_in();
        params.add_iterations(ITERATION_STEP);
        params.toggle_uv_animation();
        params.direction = CycleDirection::Descending;

        params.reset();

        assert!(params.dragging);
        assert_eq!(params.zoom, DEFAULT_ZOOM);
        assert_eq!(params.iterations, DEFAULT_ITERATIONS);
        assert!(!params.animate_uv);
        assert_eq!(params.direction, CycleDirection::Ascending);

        params.drag_to(20.0, 10.0);
        assert!((params.offset_x - 0.1).abs() < 1e-12);
    }

    #[test]
    fn iterations_saturate_at_zero() {
        let mut params = RenderParameters::new();

        for _ in 0..10 {
            params.add_iterations(-ITERATION_STEP);
        }
        assert_eq!(params.iterations, 0);

        params.scroll_iterations(-3.0);
        assert_eq!(params.iterations, 0);

        params.scroll_iterations(2.4);
        assert_eq!(params.iterations, 10);
    }

    #[test]
    fn cursor_motion_without_drag_is_ignored() {
        let mut params = RenderParameters::new();

        params.drag_to(500.0, 500.0);

        assert_eq!((params.offset_x, params.offset_y), (0.0, 0.0));
    }

    #[test]
    fn drag_ends_on_release() {
        let mut params = RenderParameters::new();
        params.begin_drag(0.0, 0.0);
        params.end_drag();

        params.drag_to(100.0, 100.0);

        assert!(!params.dragging);
        assert_eq!(params.offset_x, 0.0);
    }

    #[test]
    fn scroll_zoom_scales_with_current_zoom() {
        let mut params = RenderParameters::new();

        params.scroll_zoom(1.0);
        assert!((params.zoom - 110.0).abs() < 1e-9);

        params.zoom = 1000.0;
        params.scroll_zoom(-1.0);
        assert!((params.zoom - 900.0).abs() < 1e-9);
    }

    #[test]
    fn huge_negative_scroll_keeps_zoom_positive() {
        let mut params = RenderParameters::new();

        params.scroll_zoom(-250.0);

        assert_eq!(params.zoom, DEFAULT_ZOOM * MIN_SCROLL_ZOOM_FACTOR);
        assert!(params.zoom > 0.0);
    }

    #[test]
    fn zoom_saturates_inside_f64_range() {
        let mut params = RenderParameters::new();

        for _ in 0..2_000 {
            params.zoom_out();
        }
        assert_eq!(params.zoom, MIN_ZOOM);

        for _ in 0..4_000 {
            params.zoom_in();
        }
        assert_eq!(params.zoom, MAX_ZOOM);

        params.scroll_zoom(3.0);
        assert!(params.zoom.is_finite());
    }

    #[test]
    fn snapshot_lists_every_parameter() {
        let text = RenderParameters::new().to_string();

        assert!(text.contains("iter = 200"));
        assert!(text.contains("zoom = 100"));
        assert!(text.contains("Offsets: x = 0; y = 0"));
        assert!(text.contains("Frequency = 30"));
        assert!(text.contains("UV Offset = 0"));
        assert!(text.contains("Animations: zoom = off"));
    }
}
