use std::path::Path;

use hermod_core::Config;

use crate::event::decode;
use crate::handler::handle_event;

/// Process one hook invocation: parse the stdin payload, update the
/// session state, and send whatever notifications it warrants.
///
/// Errors surface to the CLI wrapper, which logs them and still exits
/// zero so the host agent is never blocked.
pub fn hook_entrypoint_from_stdin(stdin: &str) -> anyhow::Result<()> {
    run_hook(stdin, &hermod_store::state_path())
}

pub(crate) fn run_hook(stdin: &str, state_path: &Path) -> anyhow::Result<()> {
    let trimmed = stdin.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let raw: serde_json::Value = serde_json::from_str(trimmed)?;
    let event = decode(&raw);

    let config = Config::from_env();
    let notifications = handle_event(&event, &config, state_path)?;
    if notifications.is_empty() {
        return Ok(());
    }

    // State is already saved; missing credentials only cost the sends.
    match config.validate() {
        Ok(()) => {
            for notification in &notifications {
                hermod_notify::dispatch(&config, notification);
            }
        }
        Err(e) => eprintln!(
            "[hermod-hook] {e}; skipping {} notification(s)",
            notifications.len()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use hermod_core::SessionState;
    use hermod_store::{load_from, save_to};

    #[test]
    fn empty_stdin_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        run_hook("", &path).unwrap();
        run_hook("   \n", &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert!(run_hook("{ not json", &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn unrecognized_event_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut state = SessionState::new("abc12345", "/test/my-project");
        save_to(&path, &mut state).unwrap();
        let before = std::fs::read(&path).unwrap();

        run_hook(r#"{"hook_event_name": "Notification"}"#, &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(load_from(&path).unwrap(), state);
    }
}
