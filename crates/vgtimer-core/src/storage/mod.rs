mod config;

pub use config::{BindingsConfig, Config, DisplayConfig};

use std::path::PathBuf;

/// Returns `~/.config/vgtimer[-dev]/` based on VGTIMER_ENV.
///
/// Set VGTIMER_ENV=dev to use a development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("VGTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("vgtimer-dev")
    } else {
        base_dir.join("vgtimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
