//! Log and progress sinks for conversion events.
//!
//! A conversion reports two independent streams: human-readable log lines
//! and a fractional progress value in `[0, 1]`. Each has its own sink trait
//! so a caller can wire one to a text view and the other to a progress bar.
//!
//! Both traits are implemented for plain closures, and a request that was
//! given no sink gets a no-op one, so the pipeline never branches on whether
//! anybody is listening.
//!
//! # Example
//!
//! ```rust
//! use pdf2pptx::{LogSink, ProgressSink};
//! use std::sync::{Arc, Mutex};
//!
//! let lines = Arc::new(Mutex::new(Vec::new()));
//! let sink_lines = Arc::clone(&lines);
//! let log: Arc<dyn LogSink> = Arc::new(move |line: &str| {
//!     sink_lines.lock().unwrap().push(line.to_string());
//! });
//! log.log("hello");
//! assert_eq!(lines.lock().unwrap().len(), 1);
//!
//! let progress: Arc<dyn ProgressSink> = Arc::new(|v: f64| assert!((0.0..=1.0).contains(&v)));
//! progress.progress(0.5);
//! ```

use std::cell::Cell;
use std::sync::Arc;

/// Receives one line of human-readable text per notable event.
///
/// May be invoked rapidly from the worker thread; implementations that touch
/// UI state must marshal the line back to their own context.
pub trait LogSink: Send + Sync {
    fn log(&self, line: &str);
}

/// Receives overall progress as a value in `[0, 1]`, non-decreasing per run.
pub trait ProgressSink: Send + Sync {
    fn progress(&self, value: f64);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, line: &str) {
        self(line)
    }
}

impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn progress(&self, value: f64) {
        self(value)
    }
}

/// A log sink that discards every line.
pub fn noop_log() -> Arc<dyn LogSink> {
    Arc::new(|_: &str| {})
}

/// A progress sink that discards every value.
pub fn noop_progress() -> Arc<dyn ProgressSink> {
    Arc::new(|_: f64| {})
}

// ── Phase allocation ─────────────────────────────────────────────────────

/// Progress reported once the input has been opened.
pub const SETUP: f64 = 0.02;

/// Progress reported once the presentation has been written.
pub const SAVED: f64 = 0.95;

/// Progress reported at the very end of a successful run.
pub const DONE: f64 = 1.0;

/// A linear sub-range of the overall `[0, 1]` progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseRange {
    pub start: f64,
    pub end: f64,
}

/// Page rasterisation: 2 % → 50 %.
pub const RASTERISE: PhaseRange = PhaseRange {
    start: 0.02,
    end: 0.50,
};

/// Slide construction: 50 % → 90 %.
pub const SLIDES: PhaseRange = PhaseRange {
    start: 0.50,
    end: 0.90,
};

impl PhaseRange {
    /// Map `done` out of `total` into this range. A zero total maps to `start`.
    pub fn at(&self, done: usize, total: usize) -> f64 {
        if total == 0 {
            return self.start;
        }
        let frac = done as f64 / total as f64;
        self.start + (self.end - self.start) * frac
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────

/// Pipeline-side wrapper around both sinks.
///
/// Every progress value is clamped to `[0, 1]` and never drops below the
/// previously delivered value.
pub struct Reporter {
    log: Arc<dyn LogSink>,
    progress: Arc<dyn ProgressSink>,
    last: Cell<f64>,
}

impl Reporter {
    pub fn new(log: Arc<dyn LogSink>, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            log,
            progress,
            last: Cell::new(0.0),
        }
    }

    pub fn log(&self, line: impl AsRef<str>) {
        self.log.log(line.as_ref());
    }

    pub fn progress(&self, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let value = value.max(self.last.get());
        self.last.set(value);
        self.progress.progress(value);
    }

    /// The last value delivered to the progress sink.
    pub fn last_progress(&self) -> f64 {
        self.last.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording() -> (Arc<Mutex<Vec<f64>>>, Arc<dyn ProgressSink>) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let sink_values = Arc::clone(&values);
        let sink: Arc<dyn ProgressSink> = Arc::new(move |v: f64| {
            sink_values.lock().unwrap().push(v);
        });
        (values, sink)
    }

    #[test]
    fn phase_ranges_map_linearly() {
        assert_eq!(RASTERISE.at(0, 4), 0.02);
        assert!((RASTERISE.at(2, 4) - 0.26).abs() < 1e-9);
        assert!((RASTERISE.at(4, 4) - 0.50).abs() < 1e-9);
        assert!((SLIDES.at(1, 2) - 0.70).abs() < 1e-9);
        assert!((SLIDES.at(2, 2) - 0.90).abs() < 1e-9);
    }

    #[test]
    fn zero_total_maps_to_start() {
        assert_eq!(SLIDES.at(0, 0), 0.50);
    }

    #[test]
    fn reporter_clamps_out_of_range_values() {
        let (values, sink) = recording();
        let r = Reporter::new(noop_log(), sink);
        r.progress(-0.5);
        r.progress(1.7);
        assert_eq!(*values.lock().unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn reporter_never_goes_backwards() {
        let (values, sink) = recording();
        let r = Reporter::new(noop_log(), sink);
        r.progress(0.4);
        r.progress(0.3);
        r.progress(f64::NAN);
        r.progress(0.6);
        assert_eq!(*values.lock().unwrap(), vec![0.4, 0.4, 0.4, 0.6]);
        assert_eq!(r.last_progress(), 0.6);
    }

    #[test]
    fn reporter_forwards_log_lines() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink_lines = Arc::clone(&lines);
        let log: Arc<dyn LogSink> = Arc::new(move |l: &str| {
            sink_lines.lock().unwrap().push(l.to_owned());
        });
        let r = Reporter::new(log, noop_progress());
        r.log("one");
        r.log(format!("two {}", 2));
        assert_eq!(*lines.lock().unwrap(), vec!["one", "two 2"]);
    }

    #[test]
    fn noop_sinks_do_not_panic() {
        noop_log().log("ignored");
        noop_progress().progress(0.5);
    }
}
