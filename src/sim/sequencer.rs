/// Roll sequencer: animates a die throw without physics.
///
/// Timeline for one roll (defaults: 15 spins, 80 ms apart):
///
///   t0            start()  → Scored(face)    face drawn once, applied to score
///   t0 + 1·80     poll()   → Spin(random)    cosmetic
///   ...
///   t0 + 15·80    poll()   → Spin(random)    cosmetic
///   t0 + 16·80    poll()   → Settled(face)   same face as Scored, roll ends
///
/// Each tick is scheduled from the instant the previous one was handled,
/// so the gaps are never shorter than the interval.

use std::time::{Duration, Instant};

use crate::config::RollConfig;
use crate::domain::face::{DieSource, Face};

use super::timer::TickTimer;

/// What the sequencer hands to the controller.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RollOutcome {
    /// The draw that counts. Delivered at roll start.
    Scored(Face),
    /// Cosmetic intermediate face.
    Spin(Face),
    /// The die comes to rest on the scored face.
    Settled(Face),
}

impl RollOutcome {
    pub fn face(&self) -> Face {
        match *self {
            RollOutcome::Scored(f) | RollOutcome::Spin(f) | RollOutcome::Settled(f) => f,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, RollOutcome::Settled(_))
    }
}

/// State owned by the roll in flight. Dropping it cancels the roll.
#[derive(Debug)]
struct ActiveRoll {
    result: Face,
    spins_left: u32,
    timer: TickTimer,
}

#[derive(Debug)]
pub struct RollSequencer {
    interval: Duration,
    spin_ticks: u32,
    active: Option<ActiveRoll>,
}

impl RollSequencer {
    pub fn new(cfg: &RollConfig) -> Self {
        RollSequencer {
            interval: Duration::from_millis(cfg.tick_ms),
            spin_ticks: cfg.spin_ticks,
            active: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Begin a roll. Returns `None` if one is already running.
    pub fn start(&mut self, die: &mut dyn DieSource, now: Instant) -> Option<RollOutcome> {
        if self.active.is_some() {
            return None;
        }
        let result = die.roll();
        self.active = Some(ActiveRoll {
            result,
            spins_left: self.spin_ticks,
            timer: TickTimer::start(self.interval, now),
        });
        Some(RollOutcome::Scored(result))
    }

    /// Fire the pending tick if it is due. At most one outcome per call.
    pub fn poll(&mut self, die: &mut dyn DieSource, now: Instant) -> Option<RollOutcome> {
        let roll = self.active.as_mut()?;
        if !roll.timer.fire(now) {
            return None;
        }
        if roll.spins_left > 0 {
            roll.spins_left -= 1;
            return Some(RollOutcome::Spin(die.roll()));
        }
        // Final tick: release the timer along with the roll.
        let result = roll.result;
        self.active = None;
        Some(RollOutcome::Settled(result))
    }

    /// Abandon the roll in flight. No further outcomes are produced.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::face::ScriptedDie;

    fn cfg(tick_ms: u64, spin_ticks: u32) -> RollConfig {
        RollConfig { tick_ms, spin_ticks }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn start_scores_immediately() {
        let mut seq = RollSequencer::new(&cfg(80, 15));
        let mut die = ScriptedDie::fixed(4);
        let out = seq.start(&mut die, Instant::now());
        assert_eq!(out, Some(RollOutcome::Scored(Face::new(4).unwrap())));
        assert!(seq.is_running());
        assert_eq!(seq.active.as_ref().map(|a| a.spins_left), Some(15));
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut seq = RollSequencer::new(&cfg(80, 15));
        let mut die = ScriptedDie::new(&[2, 6]);
        let t0 = Instant::now();
        assert!(seq.start(&mut die, t0).is_some());
        assert!(seq.start(&mut die, t0 + ms(10)).is_none());
        assert_eq!(seq.active.as_ref().map(|a| a.result.value()), Some(2));
    }

    #[test]
    fn fifteen_spins_then_settles_on_scored_face() {
        let mut seq = RollSequencer::new(&cfg(80, 15));
        // First roll is the scored face; the rest are spins.
        let mut die = ScriptedDie::new(&[5, 1, 2, 3]);
        let t0 = Instant::now();
        assert_eq!(seq.start(&mut die, t0), Some(RollOutcome::Scored(Face::new(5).unwrap())));

        let mut spins = 0;
        let mut now = t0;
        loop {
            now += ms(80);
            match seq.poll(&mut die, now) {
                Some(RollOutcome::Spin(_)) => spins += 1,
                Some(RollOutcome::Settled(f)) => {
                    assert_eq!(f.value(), 5);
                    break;
                }
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(spins, 15);
        assert_eq!(now, t0 + ms(16 * 80));
        assert!(!seq.is_running());
        assert!(seq.poll(&mut die, now + ms(1000)).is_none());
    }

    #[test]
    fn nothing_fires_between_ticks() {
        let mut seq = RollSequencer::new(&cfg(80, 15));
        let mut die = ScriptedDie::fixed(1);
        let t0 = Instant::now();
        seq.start(&mut die, t0);
        assert!(seq.poll(&mut die, t0 + ms(40)).is_none());
        assert!(seq.poll(&mut die, t0 + ms(79)).is_none());
        assert!(matches!(seq.poll(&mut die, t0 + ms(80)), Some(RollOutcome::Spin(_))));
        assert!(seq.poll(&mut die, t0 + ms(120)).is_none());
    }

    #[test]
    fn cancel_silences_pending_ticks() {
        let mut seq = RollSequencer::new(&cfg(80, 15));
        let mut die = ScriptedDie::fixed(3);
        let t0 = Instant::now();
        seq.start(&mut die, t0);
        seq.poll(&mut die, t0 + ms(80));
        seq.cancel();
        assert!(!seq.is_running());
        for k in 2..20 {
            assert!(seq.poll(&mut die, t0 + ms(k * 80)).is_none());
        }
    }

    #[test]
    fn zero_spins_settles_on_first_tick() {
        let mut seq = RollSequencer::new(&cfg(50, 0));
        let mut die = ScriptedDie::fixed(2);
        let t0 = Instant::now();
        seq.start(&mut die, t0);
        assert_eq!(
            seq.poll(&mut die, t0 + ms(50)),
            Some(RollOutcome::Settled(Face::new(2).unwrap()))
        );
    }

    #[test]
    fn outcome_accessors() {
        let f = Face::new(6).unwrap();
        assert!(!RollOutcome::Scored(f).is_final());
        assert!(!RollOutcome::Spin(f).is_final());
        assert!(RollOutcome::Settled(f).is_final());
        assert_eq!(RollOutcome::Spin(f).face(), f);
    }
}
