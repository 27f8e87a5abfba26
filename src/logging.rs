/// Log setup.
///
/// The game owns the terminal (raw mode, alternate screen), so log lines
/// must never reach stdout/stderr while it runs. Logging is off unless
/// `general.log_file` names a file; the level comes from `RUST_LOG`
/// (default `info`).

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Env, Target};

use crate::error::{GameError, Result};

pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| GameError::LogFile { path: path.to_path_buf(), source })?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    Ok(())
}
