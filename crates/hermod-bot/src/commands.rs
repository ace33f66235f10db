//! Command parsing and reply rendering.
//!
//! Replies are pure functions of the command and the session state
//! snapshot, which keeps them testable without a network.

use hermod_core::fmt::{clock_of, escape_html};
use hermod_core::{SessionState, ToolStatus};

/// How many invocations /tasks shows, newest first.
const RECENT_TASKS: usize = 5;

/// Extract the command name from a message. `None` for plain chatter,
/// which the bot ignores entirely.
pub fn parse_command(text: &str) -> Option<String> {
    let token = text.trim().split_whitespace().next()?;
    let stripped = token.strip_prefix('/')?;
    // "/status@hermod_bot" arrives in group chats
    let name = stripped.split('@').next().unwrap_or(stripped);
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

/// Render the reply for a parsed command.
pub fn reply_for(
    command: &str,
    chat_id: i64,
    first_name: &str,
    state: Option<&SessionState>,
) -> String {
    match command {
        "start" => reply_start(chat_id, first_name),
        "status" => reply_status(state),
        "session" => reply_session(state),
        "tasks" => reply_tasks(state),
        "help" => reply_help(),
        other => reply_unknown(other),
    }
}

fn reply_start(chat_id: i64, first_name: &str) -> String {
    format!(
        "<b>Claude Code Monitor Bot</b>\n\n\
         Welcome {}!\n\n\
         Your Chat ID: <code>{chat_id}</code>\n\n\
         Copy this Chat ID and set it in your environment:\n\
         <code>TELEGRAM_CHAT_ID={chat_id}</code>\n\n\
         <b>Available Commands:</b>\n\
         /status - Current session status\n\
         /session - Active session details\n\
         /tasks - Recent tool executions\n\
         /help - Show this help message",
        escape_html(first_name),
    )
}

fn reply_status(state: Option<&SessionState>) -> String {
    let Some(state) = state else {
        return "<b>No active session</b>\n\nClaude Code is not currently running.".to_string();
    };
    let mut reply = format!(
        "<b>CLAUDE CODE STATUS</b>\n\n\
         <b>Status:</b> {}\n\
         <b>Session:</b> <code>{}</code>\n\
         <b>Duration:</b> {}\n\
         <b>Tools Run:</b> {}/{}\n\
         <b>Errors:</b> {}",
        if state.is_active() { "ACTIVE" } else { "IDLE" },
        escape_html(state.short_id()),
        state.duration_str(),
        state.successful_tools(),
        state.total_tools(),
        state.error_count,
    );
    if let Some(pending) = state.pending_tool() {
        reply.push_str(&format!(
            "\n\n<b>Currently Running:</b> {}",
            escape_html(&pending.tool)
        ));
    }
    reply
}

fn reply_session(state: Option<&SessionState>) -> String {
    let Some(state) = state else {
        return "<b>No session data</b>\n\nNo active session.".to_string();
    };
    format!(
        "<b>SESSION DETAILS</b>\n\n\
         <b>Session ID:</b> <code>{}</code>\n\
         <b>Project:</b> {}\n\
         <b>Started:</b> {}\n\
         <b>Status:</b> {}\n\
         <b>Duration:</b> {}\n\n\
         <b>Statistics:</b>\n\
         \x20 Total Tools: {}\n\
         \x20 Successful: {}\n\
         \x20 Failed: {}",
        escape_html(&state.id),
        escape_html(&state.project),
        state.started_at,
        if state.is_active() { "Active" } else { "Ended" },
        state.duration_str(),
        state.total_tools(),
        state.successful_tools(),
        state.failed_tools(),
    )
}

fn reply_tasks(state: Option<&SessionState>) -> String {
    let Some(state) = state else {
        return "<b>No active session</b>".to_string();
    };
    if state.tool_invocations.is_empty() {
        return "<b>No recent tasks</b>".to_string();
    }
    let mut reply = String::from("<b>RECENT TASKS</b>\n\n");
    for record in state.tool_invocations.iter().rev().take(RECENT_TASKS) {
        let marker = match record.status {
            ToolStatus::Success => "OK",
            ToolStatus::Failure => "ERR",
            ToolStatus::Pending => "..",
        };
        reply.push_str(&format!(
            "[{marker}] {} - {}\n",
            escape_html(&record.tool),
            clock_of(&record.started_at),
        ));
    }
    reply
}

fn reply_help() -> String {
    "<b>Claude Code Monitor Bot</b>\n\n\
     <b>Commands:</b>\n\
     /start - Welcome message and setup\n\
     /status - Current session status\n\
     /session - Active session details\n\
     /tasks - Recent tool executions\n\
     /help - This help message\n\n\
     <b>Notifications:</b>\n\
     You'll receive automatic notifications when:\n\
     - Sessions start and end\n\
     - Shell commands complete\n\
     - Errors occur\n\
     - A command runs longer than the configured threshold\n\n\
     <b>Setup:</b>\n\
     1. Copy your Chat ID from /start\n\
     2. Set TELEGRAM_CHAT_ID in your environment\n\
     3. Restart the bot"
        .to_string()
}

fn reply_unknown(command: &str) -> String {
    format!(
        "Unknown command: /{}\nSend /help for available commands.",
        escape_html(command)
    )
}
