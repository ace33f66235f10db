use serde_json::Value;

use crate::parse::{get_str, get_value};

/// A decoded Claude Code hook event.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    SessionStart {
        session_id: String,
        cwd: String,
    },
    PreToolUse {
        tool_name: String,
        tool_input: Value,
    },
    PostToolUse {
        tool_name: String,
        tool_input: Value,
        tool_response: Value,
    },
    PostToolUseFailure {
        tool_name: String,
        tool_input: Value,
        tool_response: Value,
    },
    SessionEnd {
        reason: String,
    },
    /// Any event name we do not recognize. Accepted and ignored so
    /// newer Claude Code releases cannot break the hook.
    Unknown,
}

/// Decode a raw hook payload by its `hook_event_name`.
pub fn decode(raw: &Value) -> HookEvent {
    match get_str(raw, "hook_event_name").as_str() {
        "SessionStart" => {
            let session_id = non_empty(get_str(raw, "session_id"), "unknown");
            HookEvent::SessionStart {
                session_id,
                cwd: get_str(raw, "cwd"),
            }
        }
        "PreToolUse" => HookEvent::PreToolUse {
            tool_name: tool_name(raw),
            tool_input: get_value(raw, "tool_input"),
        },
        "PostToolUse" => HookEvent::PostToolUse {
            tool_name: tool_name(raw),
            tool_input: get_value(raw, "tool_input"),
            tool_response: get_value(raw, "tool_response"),
        },
        "PostToolUseFailure" => HookEvent::PostToolUseFailure {
            tool_name: tool_name(raw),
            tool_input: get_value(raw, "tool_input"),
            tool_response: get_value(raw, "tool_response"),
        },
        "SessionEnd" => HookEvent::SessionEnd {
            reason: non_empty(get_str(raw, "reason"), "completed"),
        },
        _ => HookEvent::Unknown,
    }
}

fn tool_name(raw: &Value) -> String {
    non_empty(get_str(raw, "tool_name"), "Unknown")
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
