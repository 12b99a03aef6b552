use anyhow::Context;
use bookshelf_app::Application;
use bookshelf_kernel::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db_host = %settings.database.host,
        cache = ?settings.cache.backend,
        "bookshelf bootstrap starting"
    );

    Application::build(settings).await?.run().await
}
