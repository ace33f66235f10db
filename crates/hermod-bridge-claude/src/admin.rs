use std::fs;
use std::path::{Path, PathBuf};

use hermod_core::fmt::now_rfc3339;
use hermod_core::Config;

// ── Install / Uninstall ──

const HOOK_COMMAND: &str = "hermod hook claude";

/// Seconds Claude Code waits for the hook before giving up on it.
const HOOK_TIMEOUT_SECS: u64 = 15;

/// Hook events hermod manages, with the tool matcher each one needs.
/// Shell commands are the only tool class watched directly; failures
/// match any tool.
const HOOK_EVENTS: &[(&str, Option<&str>)] = &[
    ("SessionStart", None),
    ("SessionEnd", None),
    ("PreToolUse", Some("Bash")),
    ("PostToolUse", Some("Bash")),
    ("PostToolUseFailure", Some("*")),
];

fn settings_path(home: &Path) -> PathBuf {
    home.join(".claude").join("settings.json")
}

/// Check if a matcher group (Claude Code hook format) contains a
/// hermod hook.
fn matcher_group_contains_hermod(group: &serde_json::Value) -> bool {
    if let Some(hooks_arr) = group.get("hooks").and_then(|h| h.as_array()) {
        for hook in hooks_arr {
            if let Some(cmd) = hook.get("command").and_then(|c| c.as_str()) {
                if cmd.contains("hermod hook") {
                    return true;
                }
            }
        }
    }
    false
}

fn hook_group(matcher: Option<&str>) -> serde_json::Value {
    let mut group = serde_json::json!({
        "hooks": [
            {
                "type": "command",
                "command": HOOK_COMMAND,
                "timeout": HOOK_TIMEOUT_SECS
            }
        ]
    });
    if let Some(m) = matcher {
        group["matcher"] = serde_json::Value::String(m.to_string());
    }
    group
}

/// Install hermod hooks into `~/.claude/settings.json`.
pub fn install(home: &Path) -> anyhow::Result<()> {
    let path = settings_path(home);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Read existing settings or start fresh
    let mut settings: serde_json::Value = if path.exists() {
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).unwrap_or_else(|_| serde_json::json!({}))
    } else {
        serde_json::json!({})
    };

    // Backup existing file
    if path.exists() {
        let ts = now_rfc3339().replace(':', "-");
        let backup = path.with_extension(format!("json.hermod.bak.{ts}"));
        fs::copy(&path, &backup)?;
    }

    // Merge hooks
    let hooks = settings
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("settings is not an object"))?
        .entry("hooks")
        .or_insert_with(|| serde_json::json!({}));

    let hooks_obj = hooks
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("hooks is not an object"))?;

    for (event_name, matcher) in HOOK_EVENTS {
        let key = event_name.to_string();

        // Preserve existing non-hermod matcher groups
        let existing = hooks_obj.get(&key).and_then(|v| v.as_array()).cloned();
        let mut groups: Vec<serde_json::Value> = existing
            .unwrap_or_default()
            .into_iter()
            .filter(|group| !matcher_group_contains_hermod(group))
            .collect();
        groups.push(hook_group(*matcher));

        hooks_obj.insert(key, serde_json::Value::Array(groups));
    }

    let output = serde_json::to_string_pretty(&settings)?;
    fs::write(&path, output.as_bytes())?;

    println!("Installed hermod hooks into {}", path.display());
    Ok(())
}

/// Uninstall hermod hooks from `~/.claude/settings.json`.
pub fn uninstall(home: &Path) -> anyhow::Result<()> {
    let path = settings_path(home);

    if !path.exists() {
        println!("No settings file found at {}", path.display());
        return Ok(());
    }

    let content = fs::read_to_string(&path)?;
    let mut settings: serde_json::Value = serde_json::from_str(&content)?;

    if let Some(hooks) = settings
        .as_object_mut()
        .and_then(|obj| obj.get_mut("hooks"))
        .and_then(|h| h.as_object_mut())
    {
        for (event_name, _) in HOOK_EVENTS {
            let key = event_name.to_string();
            if let Some(arr) = hooks.get(&key).and_then(|v| v.as_array()).cloned() {
                let filtered: Vec<serde_json::Value> = arr
                    .into_iter()
                    .filter(|v| !matcher_group_contains_hermod(v))
                    .collect();
                if filtered.is_empty() {
                    hooks.remove(&key);
                } else {
                    hooks.insert(key, serde_json::Value::Array(filtered));
                }
            }
        }
    }

    let output = serde_json::to_string_pretty(&settings)?;
    fs::write(&path, output.as_bytes())?;

    println!("Uninstalled hermod hooks from {}", path.display());
    Ok(())
}

// ── Doctor ──

/// Check hook registration and notification readiness.
pub fn doctor(home: &Path) -> anyhow::Result<()> {
    let hermod_in_path = which_hermod();
    println!(
        "[{}] hermod in PATH: {}",
        if hermod_in_path.is_some() { "OK" } else { "WARN" },
        hermod_in_path.unwrap_or_else(|| "not found".into())
    );

    let path = settings_path(home);
    println!(
        "[{}] settings file: {}",
        if path.exists() { "OK" } else { "WARN" },
        path.display()
    );
    let settings: serde_json::Value = if path.exists() {
        let content = fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|_| serde_json::json!({}))
    } else {
        serde_json::json!({})
    };
    for (event_name, _) in HOOK_EVENTS {
        let registered = settings["hooks"][event_name]
            .as_array()
            .map(|groups| groups.iter().any(matcher_group_contains_hermod))
            .unwrap_or(false);
        println!(
            "[{}] {} hook registered",
            if registered { "OK" } else { "WARN" },
            event_name
        );
    }

    let state = hermod_store::state_path();
    println!(
        "[{}] state file: {}",
        if state.exists() { "OK" } else { "WARN" },
        state.display()
    );

    match Config::from_env().validate() {
        Ok(()) => println!("[OK] telegram credentials configured"),
        Err(e) => println!("[WARN] {e}"),
    }

    Ok(())
}

fn which_hermod() -> Option<String> {
    let path_var = std::env::var("PATH").unwrap_or_default();
    let sep = if cfg!(windows) { ';' } else { ':' };
    let exe_name = if cfg!(windows) { "hermod.exe" } else { "hermod" };
    for dir in path_var.split(sep) {
        let candidate = Path::new(dir).join(exe_name);
        if candidate.exists() {
            return Some(candidate.to_string_lossy().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_and_uninstall() {
        let tmp = tempfile::tempdir().unwrap();
        install(tmp.path()).unwrap();
        let path = tmp.path().join(".claude").join("settings.json");
        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("hermod hook claude"));

        let settings: serde_json::Value = serde_json::from_str(&content).unwrap();
        let pre_tool = &settings["hooks"]["PreToolUse"];
        let group = pre_tool.as_array().unwrap().first().unwrap();
        assert_eq!(group["matcher"].as_str().unwrap(), "Bash");
        assert_eq!(group["hooks"][0]["type"].as_str().unwrap(), "command");
        assert_eq!(
            group["hooks"][0]["command"].as_str().unwrap(),
            "hermod hook claude"
        );
        assert_eq!(group["hooks"][0]["timeout"].as_u64().unwrap(), 15);

        let failure = settings["hooks"]["PostToolUseFailure"]
            .as_array()
            .unwrap()
            .first()
            .unwrap()
            .clone();
        assert_eq!(failure["matcher"].as_str().unwrap(), "*");

        // Lifecycle events carry no tool matcher
        let start = settings["hooks"]["SessionStart"]
            .as_array()
            .unwrap()
            .first()
            .unwrap()
            .clone();
        assert!(start.get("matcher").is_none());

        uninstall(tmp.path()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("hermod hook"));
        let settings: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(settings["hooks"].get("PreToolUse").is_none());
    }

    #[test]
    fn install_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        install(tmp.path()).unwrap();
        install(tmp.path()).unwrap();

        let path = tmp.path().join(".claude").join("settings.json");
        let content = fs::read_to_string(&path).unwrap();
        let settings: serde_json::Value = serde_json::from_str(&content).unwrap();

        for (event_name, _) in HOOK_EVENTS {
            let groups = settings["hooks"][*event_name].as_array().unwrap();
            let ours = groups
                .iter()
                .filter(|g| matcher_group_contains_hermod(g))
                .count();
            assert_eq!(ours, 1, "{event_name} should have one hermod group");
        }
    }

    #[test]
    fn install_preserves_foreign_groups() {
        let tmp = tempfile::tempdir().unwrap();
        let claude_dir = tmp.path().join(".claude");
        fs::create_dir_all(&claude_dir).unwrap();
        let path = claude_dir.join("settings.json");
        let existing = serde_json::json!({
            "hooks": {
                "PostToolUse": [
                    {
                        "matcher": "Edit",
                        "hooks": [{"type": "command", "command": "fmt-on-save"}]
                    }
                ]
            },
            "model": "opus"
        });
        fs::write(&path, serde_json::to_string_pretty(&existing).unwrap()).unwrap();

        install(tmp.path()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let settings: serde_json::Value = serde_json::from_str(&content).unwrap();
        let groups = settings["hooks"]["PostToolUse"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert!(content.contains("fmt-on-save"));
        assert_eq!(settings["model"].as_str().unwrap(), "opus");

        // Install over an existing file leaves a backup behind
        let backups = fs::read_dir(&claude_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("hermod.bak"))
            .count();
        assert_eq!(backups, 1);

        uninstall(tmp.path()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("fmt-on-save"));
        assert!(!content.contains("hermod hook"));
    }

    #[test]
    fn uninstall_without_settings_file() {
        let tmp = tempfile::tempdir().unwrap();
        uninstall(tmp.path()).unwrap();
        assert!(!tmp.path().join(".claude").join("settings.json").exists());
    }
}
