use clap::Subcommand;

use hermod_core::Config;

#[derive(Subcommand)]
pub enum NotifyCmd {
    /// Send a test notification to the configured chat
    Test,
    /// Show notification configuration
    Status,
}

pub fn run(cmd: NotifyCmd) -> anyhow::Result<()> {
    let config = Config::from_env();

    match cmd {
        NotifyCmd::Test => run_test(&config),
        NotifyCmd::Status => run_status(&config),
    }
}

fn run_test(config: &Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        println!("Cannot send: {e}");
        println!();
        println!("Set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID in your environment.");
        return Ok(());
    }

    println!("Sending test notification...");
    match hermod_notify::send_test(config) {
        Ok(()) => println!("  OK  delivered to chat {}", config.chat_id),
        Err(e) => println!("  ERR {e}"),
    }
    Ok(())
}

fn run_status(config: &Config) -> anyhow::Result<()> {
    match config.validate() {
        Ok(()) => println!("Telegram credentials: configured (chat {})", config.chat_id),
        Err(e) => println!("Telegram credentials: {e}"),
    }
    println!("  notify on error: {}", config.notify_on_error);
    println!("  notify on complete: {}", config.notify_on_complete);
    println!("  notify on long-running: {}", config.notify_on_long_running);
    println!(
        "  long-running threshold: {}s",
        config.long_running_threshold_secs
    );
    Ok(())
}
