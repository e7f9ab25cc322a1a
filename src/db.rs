use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use tokio::fs;

pub const MIGRATIONS_DIR: &str = "migrations";

pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url)
        .await
        .context("failed to connect to the catalog database")?;
    Ok(conn)
}

/// Applies every `*.sql` file under [`MIGRATIONS_DIR`] in file name order.
///
/// The files only use `IF NOT EXISTS` DDL, so this runs on every start
/// without a bookkeeping table. Returns the number of statements executed.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<usize> {
    run_migrations_from(conn, Path::new(MIGRATIONS_DIR)).await
}

pub async fn run_migrations_from(conn: &DatabaseConnection, dir: &Path) -> Result<usize> {
    let files = migration_files(dir).await?;
    let backend = conn.get_database_backend();
    let mut applied = 0;

    for file in files {
        let sql = fs::read_to_string(&file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;
        let statements = split_statements(&sql);
        tracing::debug!(file = %file.display(), statements = statements.len(), "applying migration");

        // Postgres prepared statements cannot hold several commands.
        for stmt in statements {
            conn.execute(Statement::from_string(backend, stmt))
                .await
                .with_context(|| format!("migration {} failed", file.display()))?;
            applied += 1;
        }
    }

    Ok(applied)
}

async fn migration_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("missing migrations directory {}", dir.display()))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Splits a migration file on `;`, dropping `--` comment lines and empty
/// statements. Semicolons inside literals are not supported.
pub fn split_statements(sql: &str) -> Vec<String> {
    let without_comments: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}
