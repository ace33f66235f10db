//! Thin Telegram Bot API client: long-poll getUpdates, sendMessage.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);
/// Server-side long-poll window passed to getUpdates.
const POLL_WINDOW_SECS: u64 = 30;
/// Client timeout for the poll request: the poll window plus
/// transport margin.
const POLL_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub first_name: String,
}

pub struct TelegramApi {
    base_url: String,
    send_agent: ureq::Agent,
    poll_agent: ureq::Agent,
}

impl TelegramApi {
    pub fn new(bot_token: &str) -> Self {
        TelegramApi {
            base_url: format!("https://api.telegram.org/bot{bot_token}"),
            send_agent: agent_with_timeout(SEND_TIMEOUT),
            poll_agent: agent_with_timeout(POLL_TIMEOUT),
        }
    }

    /// Long-poll for updates newer than `offset`. Blocks up to the
    /// poll window when nothing is pending.
    pub fn get_updates(&self, offset: i64) -> anyhow::Result<Vec<Update>> {
        let url = format!("{}/getUpdates", self.base_url);
        let body = serde_json::json!({
            "timeout": POLL_WINDOW_SECS,
            "offset": offset,
        });
        let mut response = self
            .poll_agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(body.to_string())
            .context("getUpdates request failed")?;
        let text = response.body_mut().read_to_string()?;
        let parsed: UpdatesResponse =
            serde_json::from_str(&text).context("getUpdates returned unexpected JSON")?;
        if !parsed.ok {
            anyhow::bail!("getUpdates returned ok=false");
        }
        Ok(parsed.result)
    }

    pub fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let url = format!("{}/sendMessage", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        self.send_agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(body.to_string())?;
        Ok(())
    }
}

fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}
