use std::time::Duration;

use crate::params::{CycleDirection, RenderParameters};

/// Cadence of the fixed-rate update.
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Per-tick zoom multiplier while auto zoom is on.
pub const AUTO_ZOOM_FACTOR: f64 = 1.003;

/// Per-tick multiplier (or divisor) of the color-cycle frequency.
pub const FREQUENCY_FACTOR: f32 = 1.001;

/// The color-cycle frequency never drops below this.
pub const FREQUENCY_FLOOR: f32 = 30.0;

/// Per-tick palette scroll.
pub const UV_STEP: f32 = 0.002;

impl RenderParameters {
    /// Advances every enabled animation by one fixed step. Touches no GPU
    /// state and may run on any thread.
    pub fn tick(&mut self) {
        if self.auto_zoom {
            self.scale_zoom(AUTO_ZOOM_FACTOR);
        }

        if self.animate_frequency {
            self.step_frequency();
        }

        if self.animate_uv {
            self.uv_offset += UV_STEP;
            if self.uv_offset >= 1.0 {
                self.uv_offset -= 1.0;
            }
        }
    }

    // Bounces between the floor and max(iterations, floor).
    fn step_frequency(&mut self) {
        let ceiling = (self.iterations as f32).max(FREQUENCY_FLOOR);

        if self.frequency > ceiling {
            self.direction = CycleDirection::Descending;
        } else if self.frequency < FREQUENCY_FLOOR {
            self.direction = CycleDirection::Ascending;
            self.frequency = FREQUENCY_FLOOR;
        }

        match self.direction {
            CycleDirection::Ascending => {
                let next = self.frequency * FREQUENCY_FACTOR;
                if next > ceiling {
                    self.direction = CycleDirection::Descending;
                    self.frequency = (self.frequency / FREQUENCY_FACTOR).max(FREQUENCY_FLOOR);
                } else {
                    self.frequency = next;
                }
            }
            CycleDirection::Descending => {
                let next = self.frequency / FREQUENCY_FACTOR;
                if next < FREQUENCY_FLOOR {
                    self.direction = CycleDirection::Ascending;
                    self.frequency = FREQUENCY_FLOOR;
                } else {
                    self.frequency = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_tick_changes_nothing() {
        let mut params = RenderParameters::new();
        let before = params;

        params.tick();

        assert_eq!(params, before);
    }

    #[test]
    fn auto_zoom_grows_geometrically() {
        let mut params = RenderParameters::new();
        params.toggle_auto_zoom();

        for _ in 0..100 {
            params.tick();
        }

        let expected = 100.0 * AUTO_ZOOM_FACTOR.powi(100);
        assert!((params.zoom - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn auto_zoom_stops_at_the_largest_finite_zoom() {
        let mut params = RenderParameters::new();
        params.zoom = f64::MAX / 2.0;
        params.toggle_auto_zoom();

        for _ in 0..1_000 {
            params.tick();
        }

        assert_eq!(params.zoom, f64::MAX);
    }

    #[test]
    fn frequency_stays_on_the_floor_when_iterations_are_tiny() {
        let mut params = RenderParameters::new();
        params.iterations = 10;
        params.toggle_frequency_animation();

        for _ in 0..1_000 {
            params.tick();
            assert!(params.frequency >= FREQUENCY_FLOOR);
            assert!(params.frequency <= FREQUENCY_FLOOR * FREQUENCY_FACTOR);
        }
    }

    #[test]
    fn frequency_descends_after_iterations_are_lowered() {
        let mut params = RenderParameters::new();
        params.frequency = 150.0;
        params.iterations = 100;
        params.toggle_frequency_animation();

        params.tick();

        assert_eq!(params.direction, CycleDirection::Descending);
        assert!(params.frequency < 150.0);
    }

    #[test]
    fn uv_offset_wraps_below_one() {
        let mut params = RenderParameters::new();
        params.uv_offset = 0.999;
        params.toggle_uv_animation();

        params.tick();

        assert!(params.uv_offset >= 0.0 && params.uv_offset < 1.0);
        assert!((params.uv_offset - 0.001).abs() < 1e-5);
    }

    #[test]
    fn animations_run_independently() {
        let mut params = RenderParameters::new();
        params.toggle_auto_zoom();
        params.toggle_uv_animation();

        params.tick();

        assert!(params.zoom > 100.0);
        assert!(params.uv_offset > 0.0);
        assert_eq!(params.frequency, FREQUENCY_FLOOR);
    }
}
