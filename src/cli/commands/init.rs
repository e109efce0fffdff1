//! Initialize command.

use console::style;

use crate::config::Settings;

/// Create the database schema.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.init_schema().await?;

    let tables = ctx.list_tables().await?;
    println!(
        "{} Initialized database {} ({})",
        style("✓").green(),
        settings.display_database_url(),
        tables.join(", ")
    );

    Ok(())
}
