//! Exponential backoff schedules.

use rand::Rng;
use std::time::Duration;

/// Delay schedule applied between retry attempts.
///
/// Both variants are exponential; they differ in base alignment and in
/// whether a random jitter term is added. The attempt number is 1-based:
/// the first retry is attempt 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffSchedule {
    /// `base * 2^(attempt - 1)`. Used by HTTP-style clients.
    Doubling { base: Duration },

    /// `base * 2^attempt + uniform(0, 10) * (attempt + 1) * jitter_step`.
    /// The jitter spreads out simultaneous retries so a recovering
    /// dependency is not hit by a synchronized storm. Used by RPC-style
    /// clients.
    DoublingJitter {
        base: Duration,
        jitter_step: Duration,
    },
}

impl BackoffSchedule {
    /// Calculate the delay before the given retry attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        match *self {
            BackoffSchedule::Doubling { base } => {
                let factor = 2u64.saturating_pow(attempt - 1);
                scale(base, factor)
            }
            BackoffSchedule::DoublingJitter { base, jitter_step } => {
                let factor = 2u64.saturating_pow(attempt);
                let jitter: f64 = rand::thread_rng().gen_range(0.0..10.0);
                let jitter_ms =
                    (jitter * (attempt as f64 + 1.0) * jitter_step.as_millis() as f64) as u64;
                scale(base, factor) + Duration::from_millis(jitter_ms)
            }
        }
    }
}

fn scale(base: Duration, factor: u64) -> Duration {
    Duration::from_millis((base.as_millis() as u64).saturating_mul(factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubling_schedule() {
        let schedule = BackoffSchedule::Doubling {
            base: Duration::from_secs(1),
        };
        assert_eq!(schedule.delay_for(1), Duration::from_secs(1));
        assert_eq!(schedule.delay_for(2), Duration::from_secs(2));
        assert_eq!(schedule.delay_for(3), Duration::from_secs(4));
    }

    #[test]
    fn test_doubling_fractional_base() {
        let schedule = BackoffSchedule::Doubling {
            base: Duration::from_millis(100),
        };
        assert_eq!(schedule.delay_for(1), Duration::from_millis(100));
        assert_eq!(schedule.delay_for(2), Duration::from_millis(200));
        assert_eq!(schedule.delay_for(4), Duration::from_millis(800));
    }

    #[test]
    fn test_zero_attempt_has_no_delay() {
        let schedule = BackoffSchedule::Doubling {
            base: Duration::from_secs(1),
        };
        assert_eq!(schedule.delay_for(0), Duration::ZERO);
    }

    #[test]
    fn test_jitter_schedule_bounds() {
        let schedule = BackoffSchedule::DoublingJitter {
            base: Duration::from_millis(100),
            jitter_step: Duration::from_millis(1),
        };

        for _ in 0..50 {
            // attempt 1: 200ms exponential part, jitter in [0, 20)ms
            let delay = schedule.delay_for(1);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay < Duration::from_millis(220));
        }
    }

    #[test]
    fn test_jitter_produces_variance() {
        let schedule = BackoffSchedule::DoublingJitter {
            base: Duration::from_millis(100),
            jitter_step: Duration::from_millis(1),
        };

        let values: std::collections::HashSet<Duration> =
            (0..20).map(|_| schedule.delay_for(3)).collect();
        assert!(
            values.len() >= 2,
            "jitter should produce variance, got {} unique values",
            values.len()
        );
    }

    #[test]
    fn test_large_attempt_does_not_overflow() {
        let schedule = BackoffSchedule::Doubling {
            base: Duration::from_secs(1),
        };
        // Saturates instead of panicking
        let _ = schedule.delay_for(200);
    }
}
