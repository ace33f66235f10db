/// `hermod bot run`
pub fn run() -> anyhow::Result<()> {
    hermod_bot::run()
}
