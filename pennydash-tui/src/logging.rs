//! File-backed logging. Anything written to stderr while the alternate
//! screen is up would corrupt the UI, so `env_logger` is pointed at a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use env_logger::{Env, Target};

/// `<data_local_dir>/pennydash/pennydash.log`.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pennydash")
        .join("pennydash.log")
}

/// Initialize the global logger. `RUST_LOG` overrides `default_level`.
pub fn init(default_level: &str) -> anyhow::Result<PathBuf> {
    let path = default_log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(path)
}
