/// Keyboard input tracker.
///
/// Every game action is a one-shot (select, roll, restart, quit), so only
/// fresh presses matter. Key repeat is collapsed: holding Enter rolls once,
/// not once per repeat event.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Keys pressed (not repeated) during the most recent drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before ticking the controller.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }
    }

    fn record(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        // Release and Repeat only show up with keyboard enhancement; neither
        // is a new action.
        if key.kind == KeyEventKind::Press && !self.fresh_presses.contains(&key.code) {
            self.fresh_presses.push(key.code);
        }
    }

    /// Was this key freshly pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// First digit key 1-6 pressed this frame, if any.
    pub fn digit_pressed(&self) -> Option<u8> {
        self.fresh_presses.iter().find_map(|code| match code {
            KeyCode::Char(c @ '1'..='6') => c.to_digit(10).map(|d| d as u8),
            _ => None,
        })
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_one_to_six_only() {
        let mut kb = InputState::new();
        kb.record(press(KeyCode::Char('9')));
        kb.record(press(KeyCode::Char('0')));
        assert_eq!(kb.digit_pressed(), None);
        kb.record(press(KeyCode::Char('4')));
        assert_eq!(kb.digit_pressed(), Some(4));
    }

    #[test]
    fn repeats_and_releases_are_not_presses() {
        let mut kb = InputState::new();
        let mut rep = press(KeyCode::Enter);
        rep.kind = KeyEventKind::Repeat;
        kb.record(rep);
        let mut rel = press(KeyCode::Char(' '));
        rel.kind = KeyEventKind::Release;
        kb.record(rel);
        assert!(!kb.any_pressed(&[KeyCode::Enter, KeyCode::Char(' ')]));
    }

    #[test]
    fn ctrl_c_detected() {
        let mut kb = InputState::new();
        kb.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(kb.ctrl_c_pressed());
    }
}
