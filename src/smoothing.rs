//! Frame-rate-independent exponential smoothing for axis values.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The frame period the smoothing factor is expressed against.
///
/// A `smoothing_factor` of `f` retains a fraction `f` of the previous
/// output per 60 Hz frame; other frame rates are compensated by raising
/// the factor to `dt / REFERENCE_PERIOD`, so the response of an axis does
/// not depend on how often the caller updates.
pub const REFERENCE_PERIOD: Duration = Duration::from_micros(16_667);

/// Hard cap on the sample history, bounding memory regardless of the
/// configured sample period and the caller's frame rate.
const MAX_HISTORY_SAMPLES: usize = 256;

/// An exponential smoother with a bounded, time-windowed sample history.
///
/// Each frame the smoother blends the previous smoothed output towards the
/// incoming value; the blend weight is derived from the smoothing factor
/// and the real elapsed time, so fast and slow frame rates converge on the
/// same response. When a sample period is configured, the incoming value
/// is first averaged over the samples observed within that window, which
/// suppresses single-frame spikes.
///
/// A factor of `0.0` disables smoothing entirely: the output is exactly
/// the instantaneous input, with no history averaging and no lag.
#[derive(Debug, Clone, Default)]
pub struct ExponentialSmoother {
    history: VecDeque<(f32, Instant)>,
    previous: Option<f32>,
}

impl ExponentialSmoother {
    /// Creates an empty smoother.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all transient state: the sample history and the running
    /// output.
    pub fn reset(&mut self) {
        self.history.clear();
        self.previous = None;
    }

    /// The output of the most recent [`advance`](Self::advance) call.
    #[must_use]
    #[inline]
    pub fn previous(&self) -> Option<f32> {
        self.previous
    }

    /// Advances the smoother by one frame and returns the new output.
    ///
    /// `dt` is the real time elapsed since the previous frame; a zero `dt`
    /// repeats the previous output without advancing the blend. A zero
    /// `sample_period` disables the history window entirely.
    pub fn advance(
        &mut self,
        raw: f32,
        now: Instant,
        dt: Duration,
        sample_period: Duration,
        factor: f32,
    ) -> f32 {
        if sample_period.is_zero() {
            self.history.clear();
        } else {
            self.history.push_back((raw, now));
            while self.history.len() > MAX_HISTORY_SAMPLES {
                self.history.pop_front();
            }
            while let Some(&(_, timestamp)) = self.history.front() {
                if now.saturating_duration_since(timestamp) > sample_period {
                    self.history.pop_front();
                } else {
                    break;
                }
            }
        }

        if factor <= 0.0 {
            self.previous = Some(raw);
            return raw;
        }

        if dt.is_zero() {
            if let Some(previous) = self.previous {
                return previous;
            }
        }

        let instantaneous = if sample_period.is_zero() || self.history.is_empty() {
            raw
        } else {
            let sum: f32 = self.history.iter().map(|&(value, _)| value).sum();
            sum / self.history.len() as f32
        };

        let previous = self.previous.unwrap_or(instantaneous);
        let retained = factor.powf(dt.as_secs_f32() / REFERENCE_PERIOD.as_secs_f32());
        let smoothed = previous + (instantaneous - previous) * (1.0 - retained);
        self.previous = Some(smoothed);
        smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(
        smoother: &mut ExponentialSmoother,
        raw: f32,
        at: Instant,
        dt_ms: u64,
        factor: f32,
    ) -> f32 {
        smoother.advance(
            raw,
            at,
            Duration::from_millis(dt_ms),
            Duration::ZERO,
            factor,
        )
    }

    #[test]
    fn zero_factor_is_transparent() {
        let mut smoother = ExponentialSmoother::new();
        let mut now = Instant::now();
        for value in [0.0, 1.0, -0.5, 0.25] {
            now += Duration::from_millis(16);
            assert_eq!(step(&mut smoother, value, now, 16, 0.0), value);
        }
    }

    #[test]
    fn smoothing_lags_towards_the_target() {
        let mut smoother = ExponentialSmoother::new();
        let mut now = Instant::now();

        assert_eq!(step(&mut smoother, 0.0, now, 16, 0.5), 0.0);

        let mut previous = 0.0;
        for _ in 0..20 {
            now += Duration::from_millis(16);
            let output = step(&mut smoother, 1.0, now, 16, 0.5);
            assert!(output > previous && output < 1.0);
            previous = output;
        }
        // Converges close to the held target.
        assert!(previous > 0.99);
    }

    #[test]
    fn response_is_frame_rate_independent() {
        let factor = 0.5;
        let start = Instant::now();

        // One reference-period step...
        let mut coarse = ExponentialSmoother::new();
        coarse.advance(0.0, start, Duration::ZERO, Duration::ZERO, factor);
        let one = coarse.advance(
            1.0,
            start + REFERENCE_PERIOD,
            REFERENCE_PERIOD,
            Duration::ZERO,
            factor,
        );

        // ...equals two half-period steps.
        let half = REFERENCE_PERIOD / 2;
        let mut fine = ExponentialSmoother::new();
        fine.advance(0.0, start, Duration::ZERO, Duration::ZERO, factor);
        fine.advance(1.0, start + half, half, Duration::ZERO, factor);
        let two = fine.advance(1.0, start + 2 * half, half, Duration::ZERO, factor);

        assert!((one - two).abs() <= 1e-4, "{one} vs {two}");
    }

    #[test]
    fn zero_dt_repeats_the_previous_output() {
        let mut smoother = ExponentialSmoother::new();
        let now = Instant::now();
        let first = step(&mut smoother, 0.5, now, 16, 0.5);
        let repeated = smoother.advance(1.0, now, Duration::ZERO, Duration::ZERO, 0.5);
        assert_eq!(first, repeated);
    }

    #[test]
    fn window_average_suppresses_single_frame_spikes() {
        let period = Duration::from_millis(100);
        let start = Instant::now();

        let mut smoother = ExponentialSmoother::new();
        let mut now = start;
        for _ in 0..5 {
            now += Duration::from_millis(16);
            smoother.advance(0.0, now, Duration::from_millis(16), period, 0.5);
        }
        now += Duration::from_millis(16);
        let spiked = smoother.advance(1.0, now, Duration::from_millis(16), period, 0.5);

        let mut unwindowed = ExponentialSmoother::new();
        let mut now = start;
        for _ in 0..5 {
            now += Duration::from_millis(16);
            unwindowed.advance(0.0, now, Duration::from_millis(16), Duration::ZERO, 0.5);
        }
        now += Duration::from_millis(16);
        let unsuppressed = unwindowed.advance(1.0, now, Duration::from_millis(16), Duration::ZERO, 0.5);

        assert!(spiked < unsuppressed);
    }

    #[test]
    fn old_samples_are_evicted_from_the_window() {
        let period = Duration::from_millis(50);
        let mut smoother = ExponentialSmoother::new();
        let start = Instant::now();

        smoother.advance(1.0, start, Duration::from_millis(16), period, 0.5);
        // Far past the window: only the new sample remains.
        let later = start + Duration::from_millis(500);
        smoother.advance(0.0, later, Duration::from_millis(500), period, 0.5);
        assert_eq!(smoother.history.len(), 1);
    }

    #[test]
    fn reset_discards_transient_state() {
        let mut smoother = ExponentialSmoother::new();
        step(&mut smoother, 1.0, Instant::now(), 16, 0.5);
        smoother.reset();
        assert_eq!(smoother.previous(), None);
        assert!(smoother.history.is_empty());
    }
}
