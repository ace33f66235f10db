//! Session bookkeeping and notification decisions for hook events.
//!
//! Every event updates the state file first, then decides which
//! notifications the caller should send. Delivery itself lives in
//! hermod-notify; this module never touches the network.

use std::path::Path;

use serde_json::Value;

use hermod_core::fmt::truncate;
use hermod_core::{Config, SessionState, ToolRecord};
use hermod_notify::Notification;
use hermod_store::{load_from, save_to};

use crate::event::HookEvent;

const COMMAND_PREVIEW_MAX: usize = 80;
const OUTPUT_PREVIEW_MAX: usize = 100;
const ERROR_PREVIEW_MAX: usize = 200;

/// The tool class worth announcing on its own: shell commands.
const WATCHED_TOOL: &str = "Bash";

/// Apply a hook event to the session state at `state_path` and
/// return the notifications it calls for, in emission order.
pub fn handle_event(
    event: &HookEvent,
    config: &Config,
    state_path: &Path,
) -> anyhow::Result<Vec<Notification>> {
    let mut notifications = Vec::new();
    match event {
        HookEvent::SessionStart { session_id, cwd } => {
            // A new session replaces whatever record was left behind.
            let mut state = SessionState::new(session_id, cwd);
            save_to(state_path, &mut state)?;
            notifications.push(Notification::SessionStarted {
                session_id: state.short_id().to_string(),
                project: state.project.clone(),
            });
        }
        HookEvent::PreToolUse {
            tool_name,
            tool_input,
        } => {
            let summary = command_preview(tool_input);
            if let Some(mut state) = load_from(state_path) {
                state.start_tool(tool_name, summary.clone());
                save_to(state_path, &mut state)?;
            }
            if tool_name == WATCHED_TOOL && config.notify_on_long_running {
                notifications.push(Notification::ToolRunning {
                    tool: tool_name.clone(),
                    command: summary,
                });
            }
        }
        HookEvent::PostToolUse {
            tool_name,
            tool_input,
            tool_response,
        } => {
            if response_is_failure(tool_response) {
                handle_failure(
                    config,
                    state_path,
                    tool_name,
                    tool_input,
                    tool_response,
                    &mut notifications,
                )?;
            } else {
                let output = output_preview(tool_response);
                let record = complete_tool(state_path, tool_name, true, output.clone())?;
                if tool_name == WATCHED_TOOL && config.notify_on_complete {
                    notifications.push(Notification::ToolCompleted {
                        tool: tool_name.clone(),
                        output,
                    });
                }
                if let Some(n) = long_running_note(config, record.as_ref()) {
                    notifications.push(n);
                }
            }
        }
        HookEvent::PostToolUseFailure {
            tool_name,
            tool_input,
            tool_response,
        } => {
            handle_failure(
                config,
                state_path,
                tool_name,
                tool_input,
                tool_response,
                &mut notifications,
            )?;
        }
        HookEvent::SessionEnd { reason } => {
            if let Some(mut state) = load_from(state_path) {
                state.end_session();
                save_to(state_path, &mut state)?;
                notifications.push(Notification::SessionEnded {
                    session_id: state.short_id().to_string(),
                    duration: state.duration_str(),
                    successful: state.successful_tools(),
                    total: state.total_tools(),
                    errors: state.error_count,
                    reason: reason.clone(),
                });
            }
        }
        HookEvent::Unknown => {}
    }
    Ok(notifications)
}

fn handle_failure(
    config: &Config,
    state_path: &Path,
    tool_name: &str,
    tool_input: &Value,
    tool_response: &Value,
    notifications: &mut Vec<Notification>,
) -> anyhow::Result<()> {
    let error = error_preview(tool_response);
    let record = complete_tool(state_path, tool_name, false, error.clone())?;
    if config.notify_on_error {
        notifications.push(Notification::ToolFailed {
            tool: tool_name.to_string(),
            command: command_preview(tool_input),
            error,
        });
    }
    if let Some(n) = long_running_note(config, record.as_ref()) {
        notifications.push(n);
    }
    Ok(())
}

/// Mark the matching invocation finished and persist. Without a
/// session on disk the event is still reportable, just not recorded.
fn complete_tool(
    state_path: &Path,
    tool: &str,
    success: bool,
    summary: String,
) -> anyhow::Result<Option<ToolRecord>> {
    let Some(mut state) = load_from(state_path) else {
        return Ok(None);
    };
    let record = state.end_tool(tool, success, summary).clone();
    save_to(state_path, &mut state)?;
    Ok(Some(record))
}

fn long_running_note(config: &Config, record: Option<&ToolRecord>) -> Option<Notification> {
    if !config.notify_on_long_running {
        return None;
    }
    let record = record?;
    let elapsed = record.elapsed_secs()?;
    if elapsed > config.long_running_threshold_secs {
        Some(Notification::ToolLongRunning {
            tool: record.tool.clone(),
            elapsed_secs: elapsed,
        })
    } else {
        None
    }
}

/// Success comes from the response: an explicit `success: false` or a
/// nonzero exit code marks the invocation failed.
fn response_is_failure(tool_response: &Value) -> bool {
    if tool_response.get("success").and_then(Value::as_bool) == Some(false) {
        return true;
    }
    let exit_code = tool_response
        .get("exitCode")
        .or_else(|| tool_response.get("exit_code"))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    exit_code != 0
}

fn command_preview(tool_input: &Value) -> String {
    if let Some(cmd) = tool_input.get("command").and_then(Value::as_str) {
        return truncate(cmd, COMMAND_PREVIEW_MAX);
    }
    if tool_input.is_null() {
        return String::new();
    }
    truncate(&tool_input.to_string(), COMMAND_PREVIEW_MAX)
}

fn output_preview(tool_response: &Value) -> String {
    if let Some(out) = tool_response.get("stdout").and_then(Value::as_str) {
        return truncate(out.trim(), OUTPUT_PREVIEW_MAX);
    }
    if let Some(content) = tool_response.get("content") {
        let text = match content.as_str() {
            Some(s) => s.to_string(),
            None => content.to_string(),
        };
        return truncate(text.trim(), OUTPUT_PREVIEW_MAX);
    }
    String::new()
}

fn error_preview(tool_response: &Value) -> String {
    for key in ["stderr", "error"] {
        if let Some(err) = tool_response.get(key).and_then(Value::as_str) {
            if !err.trim().is_empty() {
                return truncate(err.trim(), ERROR_PREVIEW_MAX);
            }
        }
    }
    if tool_response.is_null() {
        return String::new();
    }
    truncate(&tool_response.to_string(), ERROR_PREVIEW_MAX)
}
