use std::fmt;

use tracing::trace;

/// Frame-driven animation loop.
///
/// The callback registered at construction receives the elapsed time, in
/// milliseconds, inside the current iteration. The host drives the loop by
/// calling `tick` from its frame callback; the first tick after `start`
/// anchors the iteration clock. Each iteration restarts elapsed time at zero
/// until `stop` is called or the iteration count is exhausted.
pub struct AnimationDriver {
    on_frame: Box<dyn FnMut(f64)>,
    duration: f64,
    iteration_count: Option<u32>,
    completed_iterations: u32,
    iteration_start: Option<f64>,
    elapsed: f64,
    running: bool,
}

impl AnimationDriver {
    pub const DEFAULT_DURATION_MS: f64 = 500.0;

    /// Driver running a single iteration of the default duration.
    #[must_use]
    pub fn new(on_frame: impl FnMut(f64) + 'static) -> Self {
        Self {
            on_frame: Box::new(on_frame),
            duration: Self::DEFAULT_DURATION_MS,
            iteration_count: Some(1),
            completed_iterations: 0,
            iteration_start: None,
            elapsed: 0.0,
            running: false,
        }
    }

    /// Non-positive or non-finite durations are ignored.
    pub fn set_duration(&mut self, duration_ms: f64) -> &mut Self {
        if duration_ms.is_finite() && duration_ms > 0.0 {
            self.duration = duration_ms;
        }
        self
    }

    /// `None` loops until `stop`.
    pub fn set_iteration_count(&mut self, iteration_count: Option<u32>) -> &mut Self {
        self.iteration_count = iteration_count;
        self
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub fn iteration_count(&self) -> Option<u32> {
        self.iteration_count
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed time of the current iteration as of the last tick.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Starts the loop; a no-op while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.completed_iterations = 0;
        self.iteration_start = None;
        self.elapsed = 0.0;
        trace!(duration = self.duration, "animation started");
    }

    pub fn stop(&mut self) {
        if self.running {
            trace!(elapsed = self.elapsed, "animation stopped");
        }
        self.running = false;
        self.iteration_start = None;
    }

    /// Host frame callback. Returns whether a frame was produced; once it
    /// returns `false` the host may stop ticking.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.running || !now_ms.is_finite() {
            return false;
        }
        let start = *self.iteration_start.get_or_insert(now_ms);
        let mut elapsed = (now_ms - start).max(0.0);
        if elapsed >= self.duration {
            self.completed_iterations = self.completed_iterations.saturating_add(1);
            if self
                .iteration_count
                .is_some_and(|count| self.completed_iterations >= count)
            {
                self.stop();
                return false;
            }
            self.iteration_start = Some(now_ms);
            elapsed = 0.0;
        }
        self.elapsed = elapsed;
        (self.on_frame)(elapsed);
        true
    }
}

impl fmt::Debug for AnimationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("duration", &self.duration)
            .field("iteration_count", &self.iteration_count)
            .field("completed_iterations", &self.completed_iterations)
            .field("elapsed", &self.elapsed)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::AnimationDriver;

    fn recording_driver() -> (AnimationDriver, Rc<RefCell<Vec<f64>>>) {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&frames);
        let driver = AnimationDriver::new(move |elapsed| sink.borrow_mut().push(elapsed));
        (driver, frames)
    }

    #[test]
    fn ticks_before_start_produce_nothing() {
        let (mut driver, frames) = recording_driver();
        assert!(!driver.tick(0.0));
        assert!(frames.borrow().is_empty());
    }

    #[test]
    fn infinite_loop_restarts_elapsed_each_iteration() {
        let (mut driver, frames) = recording_driver();
        driver.set_duration(100.0).set_iteration_count(None);
        driver.start();
        for now in [1000.0, 1040.0, 1080.0, 1100.0, 1150.0] {
            assert!(driver.tick(now));
        }
        assert_eq!(*frames.borrow(), vec![0.0, 40.0, 80.0, 0.0, 50.0]);
        assert!(driver.is_running());
    }

    #[test]
    fn finite_iterations_stop_the_driver() {
        let (mut driver, frames) = recording_driver();
        driver.set_duration(50.0).set_iteration_count(Some(1));
        driver.start();
        assert!(driver.tick(0.0));
        assert!(driver.tick(25.0));
        assert!(!driver.tick(50.0));
        assert!(!driver.is_running());
        assert_eq!(frames.borrow().len(), 2);
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let (mut driver, frames) = recording_driver();
        driver.set_duration(100.0);
        driver.start();
        driver.tick(10.0);
        driver.start();
        driver.tick(40.0);
        assert_eq!(*frames.borrow(), vec![0.0, 30.0]);
    }

    #[test]
    fn invalid_duration_is_ignored() {
        let (mut driver, _) = recording_driver();
        driver.set_duration(-5.0).set_duration(f64::NAN);
        assert_eq!(driver.duration(), AnimationDriver::DEFAULT_DURATION_MS);
    }
}
