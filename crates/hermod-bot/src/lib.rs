//! Long-polling Telegram bot service.
//!
//! Reads the session state file on demand and answers commands.
//! Strictly read-only: the hook process owns every write.

use std::time::Duration;

use anyhow::Context;

mod api;
mod commands;

pub use api::{TelegramApi, Update};
pub use commands::{parse_command, reply_for};

use hermod_core::Config;

/// Pause after a failed poll before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Run the bot until the process is killed. Fails fast when the
/// Telegram credentials are missing.
pub fn run() -> anyhow::Result<()> {
    let config = Config::from_env();
    config.validate().context("cannot start bot service")?;
    let api = TelegramApi::new(&config.bot_token);
    println!("[hermod-bot] started (chat id {})", config.chat_id);

    let mut offset: i64 = 0;
    loop {
        match api.get_updates(offset) {
            Err(e) => {
                eprintln!("[hermod-bot] poll failed: {e}");
                std::thread::sleep(RETRY_DELAY);
            }
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    handle_update(&api, &update);
                }
            }
        }
    }
}

/// Answer one update. Commands are processed in arrival order; a
/// failed reply is logged and the update is still consumed.
fn handle_update(api: &TelegramApi, update: &Update) {
    let Some(message) = &update.message else {
        return;
    };
    let Some(text) = &message.text else {
        return;
    };
    let Some(command) = parse_command(text) else {
        return;
    };

    let state = hermod_store::load();
    let first_name = message
        .from
        .as_ref()
        .map(|u| u.first_name.as_str())
        .unwrap_or("there");
    let reply = reply_for(&command, message.chat.id, first_name, state.as_ref());
    if let Err(e) = api.send_message(message.chat.id, &reply) {
        eprintln!("[hermod-bot] reply to /{command} failed: {e}");
    }
}
