mod config;

pub use config::{Config, DurationsConfig, HostConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding focusroom's config file.
///
/// `FOCUSROOM_HOME` wins when set. Otherwise `~/.config/focusroom[-dev]/`,
/// where `FOCUSROOM_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSROOM_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusroom-dev")
            } else {
                base_dir.join("focusroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
