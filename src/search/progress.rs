//! Progress reporting and cooperative cancellation
//!
//! A decision reports integer progress in `0..=100` through a
//! [`ProgressSink`]. Stages nest: each stage reports its own `0..=100`
//! and a [`ProgressScale`] maps it into the parent's range. [`Monotonic`]
//! sits at the outside and guarantees the caller never sees a value go
//! backwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receiver of progress values.
pub trait ProgressSink {
    fn report(&mut self, progress: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, progress: u8) {
        self(progress)
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _progress: u8) {}
}

/// Forwards only values above the last one delivered, clamped to 100.
pub struct Monotonic<'a> {
    inner: &'a mut dyn ProgressSink,
    last: Option<u8>,
}

impl<'a> Monotonic<'a> {
    pub fn new(inner: &'a mut dyn ProgressSink) -> Self {
        Self { inner, last: None }
    }
}

impl ProgressSink for Monotonic<'_> {
    fn report(&mut self, progress: u8) {
        let progress = progress.min(100);
        if self.last.map_or(true, |last| progress > last) {
            self.last = Some(progress);
            self.inner.report(progress);
        }
    }
}

/// Maps a child stage's `0..=100` onto `base + p * span / 100`, floored and
/// capped at `ceiling`.
pub struct ProgressScale<'a> {
    parent: &'a mut dyn ProgressSink,
    base: f64,
    span: f64,
    ceiling: u8,
}

impl<'a> ProgressScale<'a> {
    pub fn new(parent: &'a mut dyn ProgressSink, base: u8, span: f64, ceiling: u8) -> Self {
        Self {
            parent,
            base: f64::from(base),
            span,
            ceiling,
        }
    }
}

impl ProgressSink for ProgressScale<'_> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn report(&mut self, progress: u8) {
        let mapped = (self.base + f64::from(progress) / 100.0 * self.span).floor();
        let mapped = mapped.clamp(0.0, f64::from(self.ceiling)) as u8;
        self.parent.report(mapped);
    }
}

/// Throttle used inside the search: emits a value only when it is at least
/// `step` above the last emitted one, and never emits more than `cap`.
pub struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    last: u8,
    step: u8,
    cap: u8,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink, step: u8, cap: u8) -> Self {
        Self {
            sink,
            last: 0,
            step,
            cap,
        }
    }

    pub fn report(&mut self, progress: u8) {
        if progress >= self.last.saturating_add(self.step) {
            self.last = progress;
            self.sink.report(progress.min(self.cap));
        }
    }
}

/// Shared cancel flag for one decision request.
///
/// The search polls it before every candidate it expands.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: u8| seen.push(p);
            sink.report(3);
            sink.report(7);
        }
        assert_eq!(seen, vec![3, 7]);
    }

    #[test]
    fn test_monotonic_drops_regressions() {
        let mut seen = Vec::new();
        let mut record = |p: u8| seen.push(p);
        {
            let mut sink = Monotonic::new(&mut record);
            for p in [2, 4, 4, 3, 30, 18, 120, 90] {
                sink.report(p);
            }
        }
        assert_eq!(seen, vec![2, 4, 30, 100]);
    }

    #[test]
    fn test_scale_nesting() {
        let mut seen = Vec::new();
        let mut outer = |p: u8| seen.push(p);
        {
            let mut adaptive = ProgressScale::new(&mut outer, 22, 73.0, 95);
            adaptive.report(10);
            {
                let mut deep = ProgressScale::new(&mut adaptive, 10, 80.0, 100);
                deep.report(0);
                deep.report(50);
                deep.report(100);
            }
            adaptive.report(100);
        }
        // 22 + 0.1 * 73 = 29.3; deep 50 -> 50 -> 22 + 36.5 = 58.5
        assert_eq!(seen, vec![29, 29, 58, 87, 95]);
    }

    #[test]
    fn test_tracker_throttles_and_caps() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        {
            let mut tracker = ProgressTracker::new(&mut sink, 2, 90);
            for p in [1, 2, 3, 4, 10, 11, 50, 95, 96, 97] {
                tracker.report(p);
            }
        }
        assert_eq!(seen, vec![2, 4, 10, 50, 90, 90]);
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
