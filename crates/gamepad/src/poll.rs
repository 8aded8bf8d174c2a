//! Fixed-interval poll scheduling driven by caller-supplied instants.

use std::time::{Duration, Instant};

/// Cooperative fixed-interval timer.
///
/// The owner calls [`PollTimer::due`] from its event loop; the timer never
/// spawns anything. Missed ticks are skipped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the timer. The first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn due(&mut self, now: Instant) -> bool {
        let Some(next) = self.next_due else {
            return false;
        };
        if now < next {
            return false;
        }

        let mut following = next + self.interval;
        if following <= now {
            // Land on the first slot of the original grid after `now`.
            let behind = now.duration_since(next).as_nanos() % self.interval.as_nanos();
            let behind = u64::try_from(behind).map_or(Duration::ZERO, Duration::from_nanos);
            following = now + (self.interval - behind);
        }
        self.next_due = Some(following);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_is_never_due() {
        let mut timer = PollTimer::new(Duration::from_millis(50));
        assert!(!timer.due(Instant::now()));
    }

    #[test]
    fn ticks_at_fixed_interval() {
        let start = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(50));
        timer.start(start);

        assert!(timer.due(start));
        assert!(!timer.due(start + Duration::from_millis(49)));
        assert!(timer.due(start + Duration::from_millis(50)));
        assert!(!timer.due(start + Duration::from_millis(60)));
    }

    #[test]
    fn late_poll_skips_missed_ticks() {
        let start = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(10));
        timer.start(start);
        assert!(timer.due(start));

        assert!(timer.due(start + Duration::from_millis(55)));
        assert!(!timer.due(start + Duration::from_millis(59)));
        assert!(timer.due(start + Duration::from_millis(60)));
    }

    #[test]
    fn very_late_poll_stays_on_grid() {
        let start = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(1));
        timer.start(start);
        assert!(timer.due(start));

        let sixty_days = Duration::from_secs(60 * 24 * 60 * 60);
        let late = start + sixty_days + Duration::from_micros(300);
        assert!(timer.due(late));
        assert!(!timer.due(late + Duration::from_micros(500)));
        assert!(timer.due(start + sixty_days + Duration::from_millis(1)));
    }

    #[test]
    fn stop_disarms() {
        let start = Instant::now();
        let mut timer = PollTimer::new(Duration::from_millis(10));
        timer.start(start);
        timer.stop();
        assert!(!timer.is_running());
        assert!(!timer.due(start + Duration::from_secs(1)));
    }
}
