/// GameState: the complete snapshot the renderer draws from.
///
/// Mutated only by `ScoreController`. Nothing here outlives the session.

use crate::domain::face::Face;
use crate::domain::rules::{self, RollVerdict};

/// How the status line should be coloured.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Prompt,
    Info,
    Rolling,
    Win,
    Lose,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

impl Message {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Message { text: text.into(), tone }
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub score: u32,
    pub high_score: u32,
    pub selected: Face,
    pub message: Message,
    pub rolling: bool,

    // Display only
    pub shown_face: Face,
    /// Verdict of the roll in flight (or the last one), set at roll start.
    pub last_roll: Option<RollVerdict>,
    /// Increments on every cosmetic spin; drives the die flicker.
    pub spin_count: u32,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            score: rules::STARTING_SCORE,
            high_score: rules::STARTING_SCORE,
            selected: Face::ONE,
            message: Message::new(rules::INITIAL_PROMPT, Tone::Prompt),
            rolling: false,
            shown_face: Face::ONE,
            last_roll: None,
            spin_count: 0,
        }
    }

    /// Set the score and keep the high score as its running maximum.
    pub(super) fn set_score(&mut self, score: u32) {
        self.score = score;
        self.high_score = self.high_score.max(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_matches_game_start() {
        let s = GameState::new();
        assert_eq!(s.score, 100);
        assert_eq!(s.high_score, 100);
        assert_eq!(s.selected.value(), 1);
        assert!(!s.rolling);
        assert_eq!(s.message.tone, Tone::Prompt);
    }

    #[test]
    fn high_score_only_rises() {
        let mut s = GameState::new();
        s.set_score(150);
        s.set_score(20);
        assert_eq!(s.score, 20);
        assert_eq!(s.high_score, 150);
    }
}
