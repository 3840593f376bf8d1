fn main() -> anyhow::Result<()> {
    chemvis::cli::run()
}
