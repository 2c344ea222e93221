//! Bounded retry around full detection cycles

use super::types::Detection;
use std::time::Duration;

/// Blocking pause between attempts
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Run `attempt` up to `max_attempts` times, sleeping `retry_delay` between
/// attempts but never after the last one. The first detection with both
/// coordinates is returned as-is; exhaustion yields `(None, None, 0.0)`.
pub fn retry_detection<F>(
    max_attempts: u32,
    retry_delay: Duration,
    sleeper: &dyn Sleeper,
    mut attempt: F,
) -> Detection
where
    F: FnMut(u32) -> Detection,
{
    for n in 1..=max_attempts {
        log::info!("🔍 Detection attempt {}/{}", n, max_attempts);

        let detection = attempt(n);
        if detection.is_found() {
            return detection;
        }

        if n < max_attempts {
            log::info!("⏳ Retrying in {:.1}s...", retry_delay.as_secs_f32());
            sleeper.sleep(retry_delay);
        }
    }

    log::error!("❌ Failed to detect icon after {} attempts", max_attempts);
    Detection::not_found(0.0)
}
