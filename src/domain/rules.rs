/// Scoring rules — truth-table driven.
///
/// Pure functions, no side effects. They decide what a roll is worth;
/// `ScoreController` is the only caller that applies the result.
///
/// ## Scoring Truth Table
///
/// ┌───────────────────────────┬──────────────┬──────────────────────────┐
/// │ Condition                 │ Verdict      │ New score                │
/// ├───────────────────────────┼──────────────┼──────────────────────────┤
/// │ rolled == selected        │ Win          │ score + rolled × 10      │
/// │ rolled != selected        │ Lose         │ max(0, score − selected) │
/// └───────────────────────────┴──────────────┴──────────────────────────┘
///
/// The loss is the *selected* number, not the rolled one, and the score
/// floors at zero. High score is the running maximum of every score held.

use super::face::Face;

/// Score every new game (and every restart) begins with.
pub const STARTING_SCORE: u32 = 100;

/// Points per pip on a correct guess.
pub const WIN_MULTIPLIER: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RollVerdict {
    Win { rolled: Face, gain: u32 },
    Lose { rolled: Face, selected: Face, loss: u32 },
}

impl RollVerdict {
    pub fn is_win(&self) -> bool {
        matches!(self, RollVerdict::Win { .. })
    }

    pub fn rolled(&self) -> Face {
        match *self {
            RollVerdict::Win { rolled, .. } | RollVerdict::Lose { rolled, .. } => rolled,
        }
    }

    /// Status line shown once the die settles.
    pub fn message(&self) -> String {
        match *self {
            RollVerdict::Win { rolled, gain } => {
                format!("Correct! The dice shows {rolled}. +{gain} points!")
            }
            RollVerdict::Lose { rolled, selected, loss } => {
                format!("Wrong! The dice shows {rolled} (You selected {selected}). -{loss} points!")
            }
        }
    }
}

/// Points awarded when `face` is guessed correctly.
pub fn win_points(face: Face) -> u32 {
    face.value() as u32 * WIN_MULTIPLIER
}

/// Points deducted on a wrong guess with `selected` chosen.
pub fn loss_points(selected: Face) -> u32 {
    selected.value() as u32
}

/// Judge a roll against the player's selection.
pub fn judge(selected: Face, rolled: Face) -> RollVerdict {
    if rolled == selected {
        RollVerdict::Win { rolled, gain: win_points(rolled) }
    } else {
        RollVerdict::Lose { rolled, selected, loss: loss_points(selected) }
    }
}

/// Apply a verdict to a score. Never underflows.
pub fn apply(score: u32, verdict: &RollVerdict) -> u32 {
    match *verdict {
        RollVerdict::Win { gain, .. } => score.saturating_add(gain),
        RollVerdict::Lose { loss, .. } => score.saturating_sub(loss),
    }
}

// ── Status Lines ──

pub const INITIAL_PROMPT: &str = "Select a number and roll the dice!";
pub const RESTART_PROMPT: &str = "Game restarted! Select a number and roll the dice!";
pub const ROLLING: &str = "Rolling...";

pub fn selection_message(face: Face) -> String {
    format!("Selected {face}. Ready to roll!")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(v: u8) -> Face {
        Face::new(v).unwrap()
    }

    #[test]
    fn matching_face_wins_ten_per_pip() {
        let v = judge(f(3), f(3));
        assert_eq!(v, RollVerdict::Win { rolled: f(3), gain: 30 });
        assert_eq!(apply(100, &v), 130);
    }

    #[test]
    fn miss_costs_selected_number() {
        let v = judge(f(5), f(2));
        assert_eq!(v, RollVerdict::Lose { rolled: f(2), selected: f(5), loss: 5 });
        assert_eq!(apply(100, &v), 95);
    }

    #[test]
    fn miss_floors_at_zero() {
        let v = judge(f(6), f(1));
        assert_eq!(apply(3, &v), 0);
        assert_eq!(apply(0, &v), 0);
    }

    #[test]
    fn win_message_has_face_and_gain() {
        let msg = judge(f(3), f(3)).message();
        assert!(msg.contains('3'));
        assert!(msg.contains("+30"));
    }

    #[test]
    fn lose_message_uses_selected_number() {
        let msg = judge(f(5), f(2)).message();
        assert!(msg.contains("shows 2"));
        assert!(msg.contains("You selected 5"));
        assert!(msg.contains("-5 points"));
    }

    #[test]
    fn every_pair_is_judged_consistently() {
        for sel in Face::all() {
            for rolled in Face::all() {
                let v = judge(sel, rolled);
                assert_eq!(v.is_win(), sel == rolled);
                assert_eq!(v.rolled(), rolled);
            }
        }
    }
}
