use std::path::Path;

use futures_util::FutureExt;
use walkdir::WalkDir;

use crate::error::{DbError, DbResult};
use crate::store::Store;

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS _bookshelf_migrations (
        module     TEXT        NOT NULL,
        id         TEXT        NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    )
"#;

/// Migration definition contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

impl Store {
    /// Apply module migrations in the given order, skipping those already
    /// recorded in the ledger. Each migration runs in its own transaction.
    ///
    /// Returns the number of migrations applied by this call.
    pub async fn apply_migrations(&self, migrations: &[(String, Migration)]) -> DbResult<usize> {
        sqlx::raw_sql(LEDGER_DDL)
            .execute(self.pool())
            .await
            .map_err(DbError::from)?;

        let mut applied = 0;
        for (module, migration) in migrations {
            let module = module.clone();
            let migration = migration.clone();

            let ran = self
                .with_transaction(|executor| async move {
                    let mut tx = executor.acquire().await?;

                    let seen: Option<(String,)> = sqlx::query_as(
                        "SELECT id FROM _bookshelf_migrations WHERE module = $1 AND id = $2",
                    )
                    .bind(&module)
                    .bind(migration.id)
                    .fetch_optional(&mut **tx)
                    .await?;
                    if seen.is_some() {
                        return Ok(false);
                    }

                    tracing::info!(module = %module, migration = migration.id, "applying migration");
                    sqlx::Executor::execute(&mut **tx, migration.up)
                        .await
                        .map_err(|source| DbError::Migration {
                            module: module.clone(),
                            id: migration.id.to_string(),
                            source,
                        })?;

                    sqlx::query("INSERT INTO _bookshelf_migrations (module, id) VALUES ($1, $2)")
                        .bind(&module)
                        .bind(migration.id)
                        .execute(&mut **tx)
                        .await?;
                    Ok(true)
                }
                .boxed())
                .await?;

            if ran {
                applied += 1;
            }
        }

        Ok(applied)
    }

    /// Execute every `.sql` file under `dir` in directory traversal order.
    ///
    /// A missing directory is not an error. Returns the number of scripts run.
    pub async fn run_schema_dir(&self, dir: impl AsRef<Path>) -> DbResult<usize> {
        let dir = dir.as_ref();
        if !dir.exists() {
            tracing::debug!(folder = %dir.display(), "schema directory absent, skipping");
            return Ok(0);
        }

        let mut executed = 0;
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_sql_script(path) {
                continue;
            }

            tracing::info!(file = %path.display(), "executing SQL file");
            let script = std::fs::read_to_string(path).map_err(|source| DbError::SchemaScript {
                path: path.to_path_buf(),
                source,
            })?;

            sqlx::raw_sql(&script)
                .execute(self.pool())
                .await
                .map_err(|err| {
                    tracing::error!(file = %path.display(), error = %err, "SQL script failed");
                    DbError::from(err)
                })?;
            executed += 1;
        }

        tracing::info!(folder = %dir.display(), executed, "all SQL files executed");
        Ok(executed)
    }
}

fn is_sql_script(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "sql")
}
