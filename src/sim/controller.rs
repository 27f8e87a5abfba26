/// ScoreController: owns the game state and applies the scoring rule.
///
/// ## State Machine
///
///   Idle ──start_roll()──▶ Rolling ──Settled──▶ Idle
///     ▲                       │
///     └──────restart()────────┘   (restart also cancels the sequencer)
///
/// `select_number` and `start_roll` are ignored while Rolling. Every
/// operation returns the events it produced; an empty Vec means the call
/// was ignored.

use std::time::Instant;

use log::{debug, info};

use crate::config::RollConfig;
use crate::domain::face::{DieSource, Face};
use crate::domain::rules::{self, RollVerdict};

use super::event::GameEvent;
use super::sequencer::{RollOutcome, RollSequencer};
use super::state::{GameState, Message, Tone};

pub struct ScoreController {
    state: GameState,
    sequencer: RollSequencer,
    die: Box<dyn DieSource>,
}

impl ScoreController {
    pub fn new(cfg: &RollConfig, die: Box<dyn DieSource>) -> Self {
        ScoreController {
            state: GameState::new(),
            sequencer: RollSequencer::new(cfg),
            die,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_rolling(&self) -> bool {
        self.state.rolling
    }

    pub fn select_number(&mut self, n: u8) -> Vec<GameEvent> {
        if self.state.rolling {
            return Vec::new();
        }
        let Some(face) = Face::new(n) else {
            return Vec::new();
        };
        self.state.selected = face;
        self.state.message = Message::new(rules::selection_message(face), Tone::Info);
        vec![GameEvent::NumberSelected(face)]
    }

    pub fn select_next(&mut self) -> Vec<GameEvent> {
        let next = self.state.selected.next();
        self.select_number(next.value())
    }

    pub fn select_prev(&mut self) -> Vec<GameEvent> {
        let prev = self.state.selected.prev();
        self.select_number(prev.value())
    }

    /// Enter Rolling and apply the scored draw right away.
    pub fn start_roll(&mut self, now: Instant) -> Vec<GameEvent> {
        if self.state.rolling {
            return Vec::new();
        }
        let Some(outcome) = self.sequencer.start(self.die.as_mut(), now) else {
            return Vec::new();
        };
        self.state.rolling = true;
        self.state.message = Message::new(rules::ROLLING, Tone::Rolling);
        debug!("roll started, selected {}", self.state.selected);

        let mut events = vec![GameEvent::RollStarted];
        events.extend(self.on_outcome(outcome));
        events
    }

    /// Advance the roll animation. Call once per frame.
    pub fn tick(&mut self, now: Instant) -> Vec<GameEvent> {
        let Some(outcome) = self.sequencer.poll(self.die.as_mut(), now) else {
            return Vec::new();
        };
        if outcome.is_final() {
            debug!("die settled on {}", outcome.face());
        }
        self.on_outcome(outcome).into_iter().collect()
    }

    pub fn on_outcome(&mut self, outcome: RollOutcome) -> Option<GameEvent> {
        let face = outcome.face();
        match outcome {
            RollOutcome::Scored(_) => {
                let verdict = rules::judge(self.state.selected, face);
                let score = rules::apply(self.state.score, &verdict);
                self.state.set_score(score);
                self.state.last_roll = Some(verdict);
                info!("rolled {face} against {}: score {score}", self.state.selected);
                Some(GameEvent::Scored { verdict, score })
            }
            RollOutcome::Spin(_) => {
                self.state.shown_face = face;
                self.state.spin_count = self.state.spin_count.wrapping_add(1);
                Some(GameEvent::Spin(face))
            }
            RollOutcome::Settled(_) => {
                let verdict = self.verdict_for(face);
                let tone = if verdict.is_win() { Tone::Win } else { Tone::Lose };
                self.state.shown_face = face;
                self.state.message = Message::new(verdict.message(), tone);
                self.state.rolling = false;
                Some(GameEvent::Settled(verdict))
            }
        }
    }

    /// Back to a fresh game. Always succeeds, even mid-roll.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.sequencer.cancel();
        self.state = GameState::new();
        self.state.message = Message::new(rules::RESTART_PROMPT, Tone::Prompt);
        info!("game restarted");
        vec![GameEvent::Restarted]
    }

    fn verdict_for(&self, face: Face) -> RollVerdict {
        match self.state.last_roll {
            Some(v) if v.rolled() == face => v,
            _ => rules::judge(self.state.selected, face),
        }
    }
}
