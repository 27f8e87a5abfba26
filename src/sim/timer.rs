/// One-shot tick timer for frame-polled animation.
///
/// The game loop never sleeps on a timer; it polls. A `TickTimer` just
/// remembers when the next tick is due. Whoever owns it owns the pending
/// tick: dropping the timer cancels it, so a torn-down roll can never fire.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TickTimer {
    interval: Duration,
    due: Instant,
}

impl TickTimer {
    /// Schedule the first tick one interval after `now`.
    pub fn start(interval: Duration, now: Instant) -> Self {
        TickTimer { interval, due: now + interval }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Consume the pending tick if due and schedule the next one relative
    /// to `now`. Late polls don't burst: at most one tick per call.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.due = now + self.interval;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS80: Duration = Duration::from_millis(80);

    #[test]
    fn not_due_before_interval() {
        let t0 = Instant::now();
        let mut t = TickTimer::start(MS80, t0);
        assert!(!t.fire(t0));
        assert!(!t.fire(t0 + Duration::from_millis(79)));
        assert!(t.fire(t0 + MS80));
    }

    #[test]
    fn reschedules_from_firing_instant() {
        let t0 = Instant::now();
        let mut t = TickTimer::start(MS80, t0);
        let late = t0 + Duration::from_millis(200);
        assert!(t.fire(late));
        assert_eq!(t.due, late + MS80);
        // A single late poll never yields a second tick.
        assert!(!t.fire(late));
    }
}
