use std::time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts presented frames in one-second windows. Counting always runs;
/// `enabled` only decides whether a finished window is reported.
#[derive(Debug)]
pub struct FrameCounter {
    enabled: bool,
    frames: u32,
    window_start: Instant,
}

impl FrameCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            enabled: false,
            frames: 0,
            window_start: now,
        }
    }

    /// Flips reporting on or off and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Records one frame. Once a full second has passed the window restarts,
    /// and its frame count is returned if reporting is on.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;

        if now.saturating_duration_since(self.window_start) < REPORT_INTERVAL {
            return None;
        }

        let frames = self.frames;
        self.frames = 0;
        self.window_start = now;
        self.enabled.then_some(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frames(counter: &mut FrameCounter, start: Instant, count: u32) -> Vec<u32> {
        (1..=count)
            .filter_map(|i| counter.frame(start + Duration::from_millis(u64::from(i) * 10)))
            .collect()
    }

    #[test]
    fn disabled_counter_reports_nothing() {
        let start = Instant::now();
        let mut counter = FrameCounter::new(start);

        assert!(run_frames(&mut counter, start, 300).is_empty());
    }

    #[test]
    fn reports_once_per_second() {
        let start = Instant::now();
        let mut counter = FrameCounter::new(start);
        assert!(counter.toggle());

        let reports = run_frames(&mut counter, start, 250);

        assert_eq!(reports, vec![100, 100]);
    }

    #[test]
    fn window_restarts_while_disabled() {
        let start = Instant::now();
        let mut counter = FrameCounter::new(start);

        // 150 frames: one silent report at 1 s, 50 frames into the next window.
        assert!(run_frames(&mut counter, start, 150).is_empty());
        counter.toggle();

        let later = start + Duration::from_millis(1_500);
        let reports = run_frames(&mut counter, later, 50);

        assert_eq!(reports, vec![100]);
    }

    #[test]
    fn toggling_twice_turns_reporting_off() {
        let start = Instant::now();
        let mut counter = FrameCounter::new(start);

        assert!(counter.toggle());
        assert!(!counter.toggle());
        assert!(run_frames(&mut counter, start, 200).is_empty());
    }
}
