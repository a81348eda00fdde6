//! Database initialization command.

use console::style;

use crate::config::Settings;
use crate::repository::run_migrations;

/// Create the data directory and run migrations.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;
    println!(
        "{} Data directory: {}",
        style("→").cyan(),
        settings.data_dir.display()
    );

    run_migrations(&settings.database_url())
        .await
        .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
    println!(
        "  {} Database ready: {}",
        style("✓").green(),
        settings.database_path().display()
    );

    Ok(())
}
