//! Claude Code hook bridge.
//!
//! Decodes hook payloads from stdin, keeps the session state file
//! current, and triggers Telegram notifications. Also owns hook
//! registration in `~/.claude/settings.json`.

mod admin;
mod dispatch;
mod event;
mod handler;
mod parse;

pub use admin::{doctor, install, uninstall};
pub use dispatch::hook_entrypoint_from_stdin;
pub use event::{decode, HookEvent};
pub use handler::handle_event;
