fn main() -> anyhow::Result<()> {
    parserank_cli::run()
}
