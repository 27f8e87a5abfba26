/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use log::{error, info, warn};

use config::GameConfig;
use domain::face::ThreadDie;
use sim::controller::ScoreController;
use sim::event::GameEvent;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

fn main() {
    let config = GameConfig::load();

    // Terminal is still in cooked mode here, so stderr is safe.
    for w in &config.warnings {
        eprintln!("Warning: {w}");
    }
    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("Warning: {e}; logging disabled");
    }
    for w in &config.warnings {
        warn!("{w}");
    }
    match &config.source {
        Some(path) => info!("settings loaded from {}", path.display()),
        None => info!("using built-in settings"),
    }

    let mut controller = ScoreController::new(&config.roll, Box::new(ThreadDie::new()));
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut controller, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        error!("terminal cleanup failed: {e}");
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop aborted: {e}");
        eprintln!("Game error: {e}");
    }

    if controller.is_rolling() {
        info!("quit with a roll in flight");
    }
    let state = controller.state();
    info!("session over: score {}, high score {}", state.score, state.high_score);
    println!();
    println!("Thanks for playing Dice Game!");
    println!("Final Score: {}   High Score: {}", state.score, state.high_score);
}

fn game_loop(
    controller: &mut ScoreController,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> error::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }
    let frame_sleep = Duration::from_millis(config.frame_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let now = Instant::now();
        let mut quit = false;
        for cmd in read_commands(&kb, &gp) {
            match apply_command(controller, cmd, now) {
                Some(events) => process_sound_events(sound, &events),
                None => {
                    quit = true;
                    break;
                }
            }
        }
        if quit {
            break;
        }

        let events = controller.tick(Instant::now());
        process_sound_events(sound, &events);

        renderer.render(controller.state())?;
        std::thread::sleep(frame_sleep);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::NumberSelected(_) => sfx.play_select(),
            GameEvent::Spin(face) => sfx.play_spin(*face),
            GameEvent::Settled(verdict) if verdict.is_win() => sfx.play_win(),
            GameEvent::Settled(_) => sfx.play_lose(),
            GameEvent::Restarted => sfx.play_restart(),
            GameEvent::RollStarted | GameEvent::Scored { .. } => {}
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_ROLL: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// One player intent, from either keyboard or gamepad.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Command {
    Select(u8),
    Prev,
    Next,
    Roll,
    Restart,
    Quit,
}

/// Commands for this frame, in the order they are applied.
fn read_commands(kb: &InputState, gp: &GamepadState) -> Vec<Command> {
    let mut cmds = Vec::new();
    if let Some(n) = kb.digit_pressed() {
        cmds.push(Command::Select(n));
    }
    if kb.any_pressed(KEYS_LEFT) || gp.left_pressed() {
        cmds.push(Command::Prev);
    }
    if kb.any_pressed(KEYS_RIGHT) || gp.right_pressed() {
        cmds.push(Command::Next);
    }
    if kb.any_pressed(KEYS_ROLL) || gp.roll_pressed() {
        cmds.push(Command::Roll);
    }
    if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
        cmds.push(Command::Restart);
    }
    if kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
        cmds.push(Command::Quit);
    }
    cmds
}

/// Returns `None` when the player asked to quit.
fn apply_command(controller: &mut ScoreController, cmd: Command, now: Instant) -> Option<Vec<GameEvent>> {
    let events = match cmd {
        Command::Select(n) => controller.select_number(n),
        Command::Prev => controller.select_prev(),
        Command::Next => controller.select_next(),
        Command::Roll => controller.start_roll(now),
        Command::Restart => controller.restart(),
        Command::Quit => return None,
    };
    Some(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RollConfig;
    use crate::domain::face::ScriptedDie;

    fn controller(script: &[u8]) -> ScoreController {
        let cfg = RollConfig { tick_ms: 80, spin_ticks: 15 };
        ScoreController::new(&cfg, Box::new(ScriptedDie::new(script)))
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut ctl = controller(&[1]);
        assert!(apply_command(&mut ctl, Command::Quit, Instant::now()).is_none());
    }

    #[test]
    fn select_then_roll_in_one_frame() {
        let mut ctl = controller(&[3]);
        let now = Instant::now();
        apply_command(&mut ctl, Command::Select(3), now);
        let events = apply_command(&mut ctl, Command::Roll, now).unwrap_or_default();
        assert!(events.contains(&GameEvent::RollStarted));
        assert_eq!(ctl.state().score, 130);
    }

    #[test]
    fn restart_accepted_mid_roll() {
        let mut ctl = controller(&[2]);
        let now = Instant::now();
        apply_command(&mut ctl, Command::Roll, now);
        assert!(ctl.is_rolling());
        let events = apply_command(&mut ctl, Command::Restart, now).unwrap_or_default();
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert!(!ctl.is_rolling());
    }

    #[test]
    fn arrows_ignored_while_rolling() {
        let mut ctl = controller(&[2]);
        let now = Instant::now();
        apply_command(&mut ctl, Command::Roll, now);
        let events = apply_command(&mut ctl, Command::Next, now).unwrap_or_default();
        assert!(events.is_empty());
        assert_eq!(ctl.state().selected.value(), 1);
    }
}
