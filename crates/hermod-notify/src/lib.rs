//! Telegram notification delivery.
//!
//! Notifications are best-effort: one immediate retry, then the
//! message is dropped with a log line. Nothing here may fail the
//! hook that triggered it.

use std::time::Duration;

use hermod_core::fmt::{clock_time, escape_html, format_duration};
use hermod_core::Config;

const TIMEOUT: Duration = Duration::from_secs(5);

// ── Notification kinds ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    SessionStarted {
        session_id: String,
        project: String,
    },
    ToolRunning {
        tool: String,
        command: String,
    },
    ToolCompleted {
        tool: String,
        output: String,
    },
    ToolFailed {
        tool: String,
        command: String,
        error: String,
    },
    ToolLongRunning {
        tool: String,
        elapsed_secs: u64,
    },
    SessionEnded {
        session_id: String,
        duration: String,
        successful: usize,
        total: usize,
        errors: u32,
        reason: String,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::SessionStarted { .. } => "session_started",
            Notification::ToolRunning { .. } => "tool_running",
            Notification::ToolCompleted { .. } => "tool_completed",
            Notification::ToolFailed { .. } => "tool_failed",
            Notification::ToolLongRunning { .. } => "long_running",
            Notification::SessionEnded { .. } => "session_ended",
        }
    }
}

// ── Message formatting ──────────────────────────────────────────────

/// Render a notification as a Telegram HTML message. Free-text fields
/// are escaped; session ids and commands sit in `<code>` spans.
pub fn format_message(notification: &Notification) -> String {
    match notification {
        Notification::SessionStarted {
            session_id,
            project,
        } => format!(
            "<b>SESSION STARTED</b>\n\
             <b>Session:</b> <code>{}</code>\n\
             <b>Project:</b> {}\n\
             <b>Time:</b> {}",
            escape_html(session_id),
            escape_html(project),
            clock_time(),
        ),
        Notification::ToolRunning { tool, command } => format!(
            "<b>RUNNING</b>\n\
             <b>Tool:</b> {}\n\
             <b>Command:</b> <code>{}</code>\n\
             <b>Time:</b> {}",
            escape_html(tool),
            escape_html(command),
            clock_time(),
        ),
        Notification::ToolCompleted { tool, output } => {
            let mut message = format!(
                "<b>COMPLETED</b>\n\
                 <b>Tool:</b> {}\n\
                 <b>Status:</b> SUCCESS\n\
                 <b>Time:</b> {}",
                escape_html(tool),
                clock_time(),
            );
            if !output.is_empty() {
                message.push_str(&format!(
                    "\n<b>Output:</b> <code>{}</code>",
                    escape_html(output)
                ));
            }
            message
        }
        Notification::ToolFailed {
            tool,
            command,
            error,
        } => format!(
            "<b>ERROR</b>\n\
             <b>Tool:</b> {}\n\
             <b>Command:</b> <code>{}</code>\n\
             <b>Error:</b> <code>{}</code>\n\
             <b>Time:</b> {}",
            escape_html(tool),
            escape_html(command),
            escape_html(error),
            clock_time(),
        ),
        Notification::ToolLongRunning { tool, elapsed_secs } => format!(
            "<b>LONG RUNNING</b>\n\
             <b>Tool:</b> {}\n\
             <b>Elapsed:</b> {}\n\
             <b>Time:</b> {}",
            escape_html(tool),
            format_duration(*elapsed_secs),
            clock_time(),
        ),
        Notification::SessionEnded {
            session_id,
            duration,
            successful,
            total,
            errors,
            reason,
        } => format!(
            "<b>SESSION ENDED</b>\n\
             <b>Session:</b> <code>{}</code>\n\
             <b>Duration:</b> {}\n\
             <b>Tools:</b> {}/{}\n\
             <b>Errors:</b> {}\n\
             <b>Reason:</b> {}",
            escape_html(session_id),
            duration,
            successful,
            total,
            errors,
            escape_html(reason),
        ),
    }
}

// ── Delivery ────────────────────────────────────────────────────────

fn send_once(config: &Config, text: &str) -> anyhow::Result<()> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(TIMEOUT))
        .build()
        .new_agent();
    let url = format!(
        "https://api.telegram.org/bot{}/sendMessage",
        config.bot_token
    );
    let body = serde_json::json!({
        "chat_id": config.chat_id,
        "text": text,
        "parse_mode": "HTML",
    });
    agent
        .post(&url)
        .header("Content-Type", "application/json")
        .send(body.to_string())?;
    Ok(())
}

/// Send a raw message, retrying once on any failure.
pub fn send(config: &Config, text: &str) -> anyhow::Result<()> {
    if let Err(first) = send_once(config, text) {
        eprintln!("[hermod-notify] send failed, retrying once: {first}");
        send_once(config, text)?;
    }
    Ok(())
}

/// Format and send a notification. Delivery failures are logged and
/// swallowed; the caller's work is already done by the time we run.
pub fn dispatch(config: &Config, notification: &Notification) {
    let text = format_message(notification);
    if let Err(e) = send(config, &text) {
        eprintln!(
            "[hermod-notify] dropped {} notification: {e}",
            notification.kind()
        );
    }
}

/// Send a fixed test message, for `hermod notify test`.
pub fn send_test(config: &Config) -> anyhow::Result<()> {
    send(
        config,
        "hermod notify test - if you see this, notifications are working!",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_started_message() {
        let msg = format_message(&Notification::SessionStarted {
            session_id: "abc12345".into(),
            project: "my-project".into(),
        });
        assert!(msg.contains("<b>SESSION STARTED</b>"));
        assert!(msg.contains("<code>abc12345</code>"));
        assert!(msg.contains("<b>Project:</b> my-project"));
        assert!(msg.contains("<b>Time:</b>"));
    }

    #[test]
    fn running_message_escapes_command() {
        let msg = format_message(&Notification::ToolRunning {
            tool: "Bash".into(),
            command: "cat a && echo <done>".into(),
        });
        assert!(msg.contains("<b>RUNNING</b>"));
        assert!(msg.contains("cat a &amp;&amp; echo &lt;done&gt;"));
        assert!(!msg.contains("<done>"));
    }

    #[test]
    fn completed_message_output_is_optional() {
        let with = format_message(&Notification::ToolCompleted {
            tool: "Bash".into(),
            output: "3 files".into(),
        });
        assert!(with.contains("<b>Status:</b> SUCCESS"));
        assert!(with.contains("<b>Output:</b> <code>3 files</code>"));

        let without = format_message(&Notification::ToolCompleted {
            tool: "Bash".into(),
            output: String::new(),
        });
        assert!(!without.contains("Output:"));
    }

    #[test]
    fn failed_message_carries_command_and_error() {
        let msg = format_message(&Notification::ToolFailed {
            tool: "Bash".into(),
            command: "cargo build".into(),
            error: "error[E0308]: mismatched types".into(),
        });
        assert!(msg.contains("<b>ERROR</b>"));
        assert!(msg.contains("<code>cargo build</code>"));
        assert!(msg.contains("mismatched types"));
    }

    #[test]
    fn long_running_message_formats_elapsed() {
        let msg = format_message(&Notification::ToolLongRunning {
            tool: "Bash".into(),
            elapsed_secs: 95,
        });
        assert!(msg.contains("<b>LONG RUNNING</b>"));
        assert!(msg.contains("<b>Elapsed:</b> 1m 35s"));
    }

    #[test]
    fn session_ended_message_summarizes() {
        let msg = format_message(&Notification::SessionEnded {
            session_id: "abc12345".into(),
            duration: "5m 12s".into(),
            successful: 7,
            total: 9,
            errors: 2,
            reason: "completed".into(),
        });
        assert!(msg.contains("<b>SESSION ENDED</b>"));
        assert!(msg.contains("<b>Duration:</b> 5m 12s"));
        assert!(msg.contains("<b>Tools:</b> 7/9"));
        assert!(msg.contains("<b>Errors:</b> 2"));
        assert!(msg.contains("<b>Reason:</b> completed"));
    }

    #[test]
    fn kind_names_are_stable() {
        let n = Notification::ToolLongRunning {
            tool: "Bash".into(),
            elapsed_secs: 31,
        };
        assert_eq!(n.kind(), "long_running");
        let n = Notification::SessionEnded {
            session_id: "a".into(),
            duration: "1s".into(),
            successful: 0,
            total: 0,
            errors: 0,
            reason: "completed".into(),
        };
        assert_eq!(n.kind(), "session_ended");
    }
}
