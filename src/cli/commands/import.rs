//! Database import command.

use std::path::PathBuf;

use console::style;

use crate::config::Settings;
use crate::repository::{run_migrations, MovieRepository};

/// Append movie rows from other cinescrape databases into this one.
///
/// Concatenation preserves all rows; the vote normalizer is re-applied to
/// the incoming votes column on the way in.
pub async fn cmd_import(settings: &Settings, databases: &[PathBuf]) -> anyhow::Result<()> {
    if databases.is_empty() {
        println!(
            "{} No databases given. Pass one or more .db files to import.",
            style("✗").red()
        );
        return Ok(());
    }

    settings.ensure_directories()?;
    run_migrations(&settings.database_url())
        .await
        .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
    let repo = MovieRepository::new(settings.create_pool());

    let mut total = 0usize;
    for db in databases {
        if !db.exists() {
            println!(
                "  {} {} does not exist, skipping",
                style("✗").red(),
                db.display()
            );
            continue;
        }

        match repo.import_from(db).await {
            Ok(count) => {
                total += count;
                println!(
                    "  {} {}: {} movies imported",
                    style("✓").green(),
                    db.display(),
                    count
                );
            }
            Err(e) => {
                println!("  {} {}: import failed: {}", style("✗").red(), db.display(), e);
            }
        }
    }

    println!(
        "{} Combined {} movies into {}",
        style("✓").green(),
        total,
        settings.database_path().display()
    );

    Ok(())
}
