fn main() -> anyhow::Result<()> {
    quiz_site_builder::run()
}
