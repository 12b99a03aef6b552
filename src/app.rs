//! Application bootstrap: connect, migrate, run modules, serve.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;

use bookshelf_cache::Cache;
use bookshelf_db::Store;
use bookshelf_kernel::{InitCtx, ModuleRegistry, Settings};

use crate::modules;

/// Connected store and cache plus the registered modules.
pub struct Application {
    settings: Settings,
    store: Store,
    cache: Arc<dyn Cache>,
    registry: ModuleRegistry,
}

impl Application {
    /// Connect to Postgres and the cache, then register modules.
    ///
    /// Both connections are health-checked within their configured
    /// timeouts; either failing aborts startup.
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let store = Store::connect(&settings.database)
            .await
            .context("database health check failed")?;
        let cache = bookshelf_cache::connect(&settings.cache)
            .await
            .context("cache health check failed")?;

        Ok(Self::with_parts(settings, store, cache))
    }

    /// Assemble from already connected parts.
    pub fn with_parts(settings: Settings, store: Store, cache: Arc<dyn Cache>) -> Self {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &store, &cache);
        tracing::info!(modules = registry.module_count(), "modules registered");

        Self {
            settings,
            store,
            cache,
            registry,
        }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The complete HTTP router, without binding a listener.
    pub fn router(&self) -> Router {
        bookshelf_http::build_router(&self.registry, &self.settings.server)
    }

    /// Apply module migrations, then every `.sql` file under the schema dir.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        let migrations = self.registry.collect_migrations();
        let applied = self
            .store
            .apply_migrations(&migrations)
            .await
            .context("failed to apply module migrations")?;
        tracing::info!(applied, total = migrations.len(), "module migrations applied");

        let schema_dir = &self.settings.database.schema_dir;
        let scripts = self
            .store
            .run_schema_dir(schema_dir)
            .await
            .with_context(|| format!("failed to run schema scripts in '{schema_dir}'"))?;
        tracing::info!(scripts, dir = %schema_dir, "schema scripts executed");

        Ok(())
    }

    /// Migrate, start every module and serve until shutdown.
    pub async fn run(self) -> anyhow::Result<()> {
        self.migrate().await?;

        let ctx = InitCtx {
            settings: &self.settings,
            store: &self.store,
            cache: &self.cache,
        };
        self.registry.init_modules(&ctx).await?;
        self.registry.start_modules(&ctx).await?;

        let served = bookshelf_http::start_server(&self.registry, &self.settings.server).await;

        let stopped = self.registry.stop_modules().await;
        self.store.close().await;
        tracing::info!("bookshelf shut down");

        served?;
        stopped
    }
}

/// Verify the database and cache answer, then disconnect.
pub async fn check(settings: &Settings) -> anyhow::Result<()> {
    let store = Store::connect(&settings.database)
        .await
        .context("database health check failed")?;
    let cache = bookshelf_cache::connect(&settings.cache)
        .await
        .context("cache health check failed")?;
    cache.ping().await.context("cache ping failed")?;
    store.close().await;

    tracing::info!("database and cache are reachable");
    Ok(())
}
