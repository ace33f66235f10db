use std::io::Read;
use std::path::PathBuf;

fn home_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}

/// `hermod bridge claude install`
pub fn install() -> anyhow::Result<()> {
    hermod_bridge_claude::install(&home_dir()?)
}

/// `hermod bridge claude uninstall`
pub fn uninstall() -> anyhow::Result<()> {
    hermod_bridge_claude::uninstall(&home_dir()?)
}

/// `hermod doctor claude`
pub fn doctor() -> anyhow::Result<()> {
    hermod_bridge_claude::doctor(&home_dir()?)
}

/// `hermod hook claude`: read stdin, process the hook payload.
pub fn hook_claude() -> anyhow::Result<()> {
    let mut stdin_buf = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut stdin_buf) {
        debug_log(&format!("STDIN READ ERROR: {e}"));
        return Ok(());
    }

    let clip: String = stdin_buf.chars().take(200).collect();
    debug_log(&format!("STDIN({} bytes): {}", stdin_buf.len(), clip));

    match hermod_bridge_claude::hook_entrypoint_from_stdin(&stdin_buf) {
        Ok(()) => {
            debug_log("OK");
            Ok(())
        }
        Err(e) => {
            debug_log(&format!("ERROR: {e}"));
            // Exit 0 on internal errors; never block the host agent
            Ok(())
        }
    }
}

fn debug_log(msg: &str) {
    if std::env::var_os("HERMOD_DEBUG").is_none() {
        return;
    }
    use std::io::Write;
    let log_path = std::env::temp_dir().join("hermod-hook-debug.log");
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let ts = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        let _ = writeln!(f, "[{ts}] {msg}");
    }
}
