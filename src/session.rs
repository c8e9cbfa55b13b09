use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const SESSION_DIR: &str = "ngsc_terminal";
const SESSION_FILE: &str = "session.json";
const SESSION_VERSION: u32 = 1;

/// The session token is the only state this client persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    version: u32,
    pub token: String,
    pub username: String,
    saved_at: u64,
}

pub fn load() -> Option<StoredSession> {
    let path = session_path()?;
    let raw = fs::read_to_string(path).ok()?;
    let session = serde_json::from_str::<StoredSession>(&raw).ok()?;
    if session.version != SESSION_VERSION || session.token.trim().is_empty() {
        return None;
    }
    Some(session)
}

pub fn save(token: &str, username: &str) {
    let Some(path) = session_path() else {
        return;
    };
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let session = StoredSession {
        version: SESSION_VERSION,
        token: token.to_string(),
        username: username.to_string(),
        saved_at: now_secs(),
    };
    if let Ok(json) = serde_json::to_string(&session) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, &path);
        }
    }
}

pub fn clear() {
    if let Some(path) = session_path() {
        let _ = fs::remove_file(path);
    }
}

fn session_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(SESSION_DIR).join(SESSION_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(SESSION_DIR)
            .join(SESSION_FILE),
    )
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
