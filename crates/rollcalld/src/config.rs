use std::path::PathBuf;

use anyhow::Context;
use rollcall_core::Roster;

/// Roster shipped with the daemon, used when no roster file is configured.
const DEFAULT_ROSTER: &str = include_str!("../../../contrib/roster.toml");

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Path to the SQLite ledger database file.
    pub db_path: PathBuf,
    /// Recognition gateway endpoint (receives the image, returns a prediction).
    pub gateway_url: String,
    /// Confidence must be strictly above this for a mark to happen.
    /// 0.98 suits the in-house model; drop to ~0.8 for a generic one.
    pub confidence_threshold: f32,
    /// Total timeout in seconds for one gateway call.
    pub gateway_timeout_secs: u64,
    /// Optional roster TOML file; falls back to the built-in roster.
    pub roster_path: Option<PathBuf>,
    /// Drop marks for predicted names not on the roster.
    pub roster_only: bool,
}

impl Config {
    /// Load configuration from `ROLLCALL_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("rollcall");

        let db_path = std::env::var("ROLLCALL_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("attendance.db"));

        Self {
            db_path,
            gateway_url: std::env::var("ROLLCALL_GATEWAY_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:7860/predict".to_string()),
            confidence_threshold: env_f32("ROLLCALL_CONFIDENCE_THRESHOLD", 0.98),
            gateway_timeout_secs: env_u64("ROLLCALL_GATEWAY_TIMEOUT_SECS", 10),
            roster_path: std::env::var("ROLLCALL_ROSTER_PATH").map(PathBuf::from).ok(),
            roster_only: std::env::var("ROLLCALL_ROSTER_ONLY")
                .map(|v| v != "0")
                .unwrap_or(false),
        }
    }

    /// Load the roster from the configured file, or the built-in default.
    pub fn load_roster(&self) -> anyhow::Result<Roster> {
        match &self.roster_path {
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .with_context(|| format!("reading roster {}", path.display()))?;
                Ok(Roster::from_toml_str(&src)?)
            }
            None => Ok(Roster::from_toml_str(DEFAULT_ROSTER)?),
        }
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_parses() {
        let roster = Roster::from_toml_str(DEFAULT_ROSTER).unwrap();
        assert_eq!(roster.len(), 3);
        assert!(roster.contains("Ashok"));
        assert!(roster.contains("Priyansh"));
        assert!(roster.contains("Vrajesh"));
    }
}
