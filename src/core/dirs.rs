use crate::core::error::RevlocError;
use std::path::PathBuf;

const APP_DIR: &str = "git-revloc";

pub fn get_config_directory() -> Result<PathBuf, RevlocError> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config")),
        "macos" => dirs::home_dir()
            .unwrap_or_default()
            .join("Library/Application Support"),
        _ => dirs::config_dir().unwrap_or_default(),
    };

    Ok(base.join(APP_DIR))
}

pub fn get_config_file() -> Result<PathBuf, RevlocError> {
    Ok(get_config_directory()?.join("config.json"))
}
