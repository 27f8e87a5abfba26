/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub roll: RollConfig,
    pub gamepad: GamepadConfig,
    pub frame_ms: u64,
    pub log_file: Option<PathBuf>,
    /// Where the settings came from (None = built-in defaults).
    pub source: Option<PathBuf>,
    /// Problems found while loading; reported once logging is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollConfig {
    pub tick_ms: u64,
    pub spin_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub roll: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for RollConfig {
    fn default() -> Self {
        RollConfig {
            tick_ms: default_tick_ms(),
            spin_ticks: default_spin_ticks(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    roll: TomlRoll,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRoll {
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,
    #[serde(default = "default_spin_ticks")]
    spin_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_roll_buttons")]
    roll: Vec<String>,
    #[serde(default = "default_restart_buttons")]
    restart: Vec<String>,
    #[serde(default = "default_quit_buttons")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default)]
    log_file: String,
}

// ── Defaults ──

fn default_tick_ms() -> u64 { 80 }
fn default_spin_ticks() -> u32 { 15 }
fn default_frame_ms() -> u64 { 5 }

fn default_roll_buttons() -> Vec<String> { vec!["A".into(), "X".into()] }
fn default_restart_buttons() -> Vec<String> { vec!["Start".into()] }
fn default_quit_buttons() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlRoll {
    fn default() -> Self {
        TomlRoll {
            tick_ms: default_tick_ms(),
            spin_ticks: default_spin_ticks(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            roll: default_roll_buttons(),
            restart: default_restart_buttons(),
            quit: default_quit_buttons(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            frame_ms: default_frame_ms(),
            log_file: String::new(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/dicegame, (4) /usr/share/dicegame.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = Vec::new();
        let (toml_cfg, source) = load_toml(&search_dirs, &mut warnings);
        Self::resolve(toml_cfg, source, warnings)
    }

    /// Build a config from TOML text. Parse errors fall back to defaults
    /// with a warning, exactly as a bad file on disk does.
    pub fn from_toml_str(text: &str) -> Self {
        let mut warnings = Vec::new();
        let toml_cfg = match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warnings.push(format!("config parse error: {e}; using default settings"));
                TomlConfig::default()
            }
        };
        Self::resolve(toml_cfg, None, warnings)
    }

    fn resolve(toml_cfg: TomlConfig, source: Option<PathBuf>, mut warnings: Vec<String>) -> Self {
        let mut tick_ms = toml_cfg.roll.tick_ms;
        if tick_ms == 0 {
            warnings.push("roll.tick_ms must be at least 1; using 1".into());
            tick_ms = 1;
        }
        let mut frame_ms = toml_cfg.general.frame_ms;
        if frame_ms == 0 {
            warnings.push("general.frame_ms must be at least 1; using 1".into());
            frame_ms = 1;
        }
        let log_file = match toml_cfg.general.log_file.trim() {
            "" => None,
            path => Some(resolve_relative(path, source.as_deref())),
        };

        GameConfig {
            roll: RollConfig {
                tick_ms,
                spin_ticks: toml_cfg.roll.spin_ticks,
            },
            gamepad: GamepadConfig {
                roll: toml_cfg.gamepad.roll,
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            frame_ms,
            log_file,
            source,
            warnings,
        }
    }
}

/// Relative log paths are anchored next to the config file that named them.
fn resolve_relative(path: &str, config_file: Option<&Path>) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        return p;
    }
    match config_file.and_then(Path::parent) {
        Some(dir) => dir.join(p),
        None => p,
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/dicegame");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/dicegame");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> (TomlConfig, Option<PathBuf>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return (cfg, Some(path)),
                Err(e) => {
                    warnings.push(format!("{} parse error: {e}; using default settings", path.display()));
                    return (TomlConfig::default(), None);
                }
            },
            Err(e) => {
                warnings.push(format!("could not read {}: {e}", path.display()));
            }
        }
    }
    (TomlConfig::default(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("");
        assert_eq!(cfg.roll, RollConfig { tick_ms: 80, spin_ticks: 15 });
        assert_eq!(cfg.frame_ms, 5);
        assert!(cfg.log_file.is_none());
        assert!(cfg.warnings.is_empty());
        assert_eq!(cfg.gamepad.restart, vec!["Start".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str("[roll]\nspin_ticks = 8\n");
        assert_eq!(cfg.roll.spin_ticks, 8);
        assert_eq!(cfg.roll.tick_ms, 80);
    }

    #[test]
    fn zero_intervals_are_clamped() {
        let cfg = GameConfig::from_toml_str("[roll]\ntick_ms = 0\n[general]\nframe_ms = 0\n");
        assert_eq!(cfg.roll.tick_ms, 1);
        assert_eq!(cfg.frame_ms, 1);
        assert_eq!(cfg.warnings.len(), 2);
    }

    #[test]
    fn parse_error_falls_back_with_warning() {
        let cfg = GameConfig::from_toml_str("[roll\ntick_ms = 80");
        assert_eq!(cfg.roll, RollConfig::default());
        assert_eq!(cfg.warnings.len(), 1);
    }

    #[test]
    fn log_file_is_read() {
        let cfg = GameConfig::from_toml_str("[general]\nlog_file = \"dice.log\"\n");
        assert_eq!(cfg.log_file, Some(PathBuf::from("dice.log")));
    }

    #[test]
    fn relative_log_path_follows_config_dir() {
        let p = resolve_relative("dice.log", Some(Path::new("/opt/dice/config.toml")));
        assert_eq!(p, PathBuf::from("/opt/dice/dice.log"));
        let abs = resolve_relative("/var/log/dice.log", Some(Path::new("/opt/dice/config.toml")));
        assert_eq!(abs, PathBuf::from("/var/log/dice.log"));
    }
}
