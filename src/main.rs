fn main() -> anyhow::Result<()> {
    moodjournal::cli::run()
}
