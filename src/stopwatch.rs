use std::time::Instant;

/// Wall-clock stopwatch behind a task's `current_duration`.
///
/// Elapsed time is accumulated in whole seconds at every stop, so the value
/// handed to the task log is always an integer second count.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    accumulated: u64,
    started: Option<Instant>,
}

impl Stopwatch {
    pub fn new(initial_secs: u64) -> Self {
        Self { accumulated: initial_secs, started: None }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    pub fn stop(&mut self) -> u64 {
        self.stop_at(Instant::now())
    }

    pub fn stop_at(&mut self, now: Instant) -> u64 {
        if let Some(started) = self.started.take() {
            self.accumulated += now.saturating_duration_since(started).as_secs();
        }
        self.accumulated
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> u64 {
        let running = self.started.map_or(0, |s| now.saturating_duration_since(s).as_secs());
        self.accumulated + running
    }

    /// Manual correction: stops the clock and replaces the value.
    pub fn set_minutes(&mut self, minutes: u64) -> u64 {
        self.started = None;
        self.accumulated = minutes.saturating_mul(60);
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn accumulates_whole_seconds_across_runs() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new(30);

        sw.start_at(t0);
        assert!(sw.is_running());
        assert_eq!(sw.elapsed_at(t0 + Duration::from_millis(2500)), 32);
        assert_eq!(sw.stop_at(t0 + Duration::from_millis(2500)), 32);
        assert!(!sw.is_running());

        let t1 = t0 + Duration::from_secs(10);
        sw.start_at(t1);
        assert_eq!(sw.stop_at(t1 + Duration::from_secs(60)), 92);
    }

    #[test]
    fn stop_without_start_keeps_value() {
        let mut sw = Stopwatch::new(5);
        assert_eq!(sw.stop(), 5);
    }

    #[test]
    fn double_start_keeps_first_instant() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::default();
        sw.start_at(t0);
        sw.start_at(t0 + Duration::from_secs(5));
        assert_eq!(sw.stop_at(t0 + Duration::from_secs(8)), 8);
    }

    #[test]
    fn manual_minutes_stop_the_clock() {
        let mut sw = Stopwatch::default();
        sw.start();
        sw.set_minutes(25);
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed_secs(), 1500);
    }

    #[test]
    fn huge_manual_minutes_saturate() {
        let mut sw = Stopwatch::default();
        assert_eq!(sw.set_minutes(u64::MAX / 60 + 1), u64::MAX);
    }
}
