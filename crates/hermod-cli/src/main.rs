mod cmd_bot;
mod cmd_bridge;
mod cmd_notify;
mod cmd_status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hermod",
    version,
    about = "Telegram notifications for Claude Code sessions"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the Telegram bot service
    Bot {
        #[command(subcommand)]
        cmd: BotCmd,
    },
    /// Hook entrypoint (called by Claude Code hooks)
    Hook {
        #[command(subcommand)]
        cmd: HookCmd,
    },
    /// Bridge operations (install/uninstall hooks for Claude Code)
    Bridge {
        #[command(subcommand)]
        cmd: BridgeCmd,
    },
    /// Health check for bridge integration
    Doctor {
        #[command(subcommand)]
        cmd: DoctorCmd,
    },
    /// Notification delivery checks
    Notify {
        #[command(subcommand)]
        cmd: cmd_notify::NotifyCmd,
    },
    /// Show current session status
    Status,
}

#[derive(Subcommand)]
enum BotCmd {
    /// Start long-polling for commands
    Run,
}

#[derive(Subcommand)]
enum HookCmd {
    /// Process one Claude Code hook payload from stdin
    Claude,
}

#[derive(Subcommand)]
enum BridgeCmd {
    /// Claude Code bridge operations
    Claude {
        #[command(subcommand)]
        cmd: BridgeClaudeCmd,
    },
}

#[derive(Subcommand)]
enum BridgeClaudeCmd {
    /// Install hermod hooks into ~/.claude/settings.json
    Install,
    /// Uninstall hermod hooks from ~/.claude/settings.json
    Uninstall,
}

#[derive(Subcommand)]
enum DoctorCmd {
    /// Check hook registration and Telegram credentials
    Claude,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Bot { cmd } => match cmd {
            BotCmd::Run => cmd_bot::run(),
        },
        Command::Hook { cmd } => match cmd {
            HookCmd::Claude => cmd_bridge::hook_claude(),
        },
        Command::Bridge { cmd } => match cmd {
            BridgeCmd::Claude { cmd } => match cmd {
                BridgeClaudeCmd::Install => cmd_bridge::install(),
                BridgeClaudeCmd::Uninstall => cmd_bridge::uninstall(),
            },
        },
        Command::Doctor { cmd } => match cmd {
            DoctorCmd::Claude => cmd_bridge::doctor(),
        },
        Command::Notify { cmd } => cmd_notify::run(cmd),
        Command::Status => cmd_status::execute(),
    }
}
