fn main() -> anyhow::Result<()> {
    quarkboard_cli::run()
}
