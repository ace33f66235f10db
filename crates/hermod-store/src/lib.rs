//! Session state persistence.
//!
//! One JSON file holds the current session. The hook process is the
//! only writer and replaces the file atomically on every update; the
//! bot process only reads. That write discipline is the whole
//! concurrency story, no locks are involved.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::NamedTempFile;

use hermod_core::fmt::now_rfc3339;
use hermod_core::SessionState;

const STATE_FILE: &str = "session.json";

/// Directory holding the state file. `HERMOD_STATE_DIR` overrides the
/// platform default, which keeps tests and multi-host setups apart.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("HERMOD_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(data) = dirs::data_dir() {
        return data.join("hermod");
    }
    dirs::home_dir()
        .map(|h| h.join(".hermod"))
        .unwrap_or_else(|| PathBuf::from(".hermod"))
}

pub fn state_path() -> PathBuf {
    state_dir().join(STATE_FILE)
}

/// Read session state from `path`. Absent, unreadable, and corrupt
/// files all mean the same thing to callers: no usable session.
pub fn load_from(path: &Path) -> Option<SessionState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write session state to `path`, stamping `last_update` first.
pub fn save_to(path: &Path, state: &mut SessionState) -> anyhow::Result<()> {
    state.last_update = now_rfc3339();
    let json = serde_json::to_string_pretty(state)?;
    write_atomic(path, json.as_bytes())
        .with_context(|| format!("failed to write state to {}", path.display()))
}

pub fn load() -> Option<SessionState> {
    load_from(&state_path())
}

pub fn save(state: &mut SessionState) -> anyhow::Result<()> {
    save_to(&state_path(), state)
}

/// Write via a temp file in the same directory, then rename over the
/// target so readers never observe a half-written file.
fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from(&dir.path().join("session.json")).is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut state = SessionState::new("abc12345", "/test/my-project");
        state.start_tool("Bash", "ls".into());
        save_to(&path, &mut state).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, state);
        assert!(!loaded.last_update.is_empty());
    }

    #[test]
    fn save_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut first = SessionState::new("first", "/a");
        save_to(&path, &mut first).unwrap();
        let mut second = SessionState::new("second", "/b");
        save_to(&path, &mut second).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.id, "second");
        assert_eq!(loaded.project, "b");
    }

    #[test]
    fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_from(&path).is_none());
    }

    #[test]
    fn load_twice_returns_equal_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut state = SessionState::new("abc", "/p");
        save_to(&path, &mut state).unwrap();

        let a = load_from(&path).unwrap();
        let b = load_from(&path).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut state = SessionState::new("abc", "/p");
        save_to(&path, &mut state).unwrap();
        assert!(path.exists());
    }

    // Sole test in this crate touching the environment.
    #[test]
    fn state_dir_honors_override() {
        std::env::set_var("HERMOD_STATE_DIR", "/tmp/hermod-test-state");
        assert_eq!(state_dir(), PathBuf::from("/tmp/hermod-test-state"));
        assert_eq!(
            state_path(),
            PathBuf::from("/tmp/hermod-test-state/session.json")
        );
        std::env::remove_var("HERMOD_STATE_DIR");
        assert_ne!(state_dir(), PathBuf::from("/tmp/hermod-test-state"));
    }
}
