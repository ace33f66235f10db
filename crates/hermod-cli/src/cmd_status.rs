/// `hermod status`
pub fn execute() -> anyhow::Result<()> {
    let Some(state) = hermod_store::load() else {
        println!("No active session.");
        return Ok(());
    };

    println!("Session: {}", state.short_id());
    println!("Project: {}", state.project);
    println!("Started: {}", state.started_at);
    if let Some(ended) = &state.ended_at {
        println!("Ended: {ended}");
    }
    println!("Duration: {}", state.duration_str());
    println!(
        "Tools: {} total, {} ok, {} failed",
        state.total_tools(),
        state.successful_tools(),
        state.failed_tools()
    );
    if let Some(pending) = state.pending_tool() {
        println!("Running: {}", pending.tool);
    }
    Ok(())
}
