use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://admin.thebegames.com";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base: String,
    /// Refresh interval for the live match list.
    pub list_poll: Duration,
    /// Refresh interval for an open match while it is live.
    pub detail_poll: Duration,
    pub export_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        let api_base = opt_env("NGSC_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let list_poll = Duration::from_secs(
            env_u64("LIST_POLL_SECS").unwrap_or(10).clamp(5, 300),
        );
        let detail_poll = Duration::from_secs(
            env_u64("DETAIL_POLL_SECS").unwrap_or(30).clamp(10, 600),
        );
        let export_dir = opt_env("NGSC_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            api_base,
            list_poll,
            detail_poll,
            export_dir,
        }
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn opt_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|val| {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|val| val.parse::<u64>().ok())
}
