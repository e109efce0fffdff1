//! Web server command.

use console::style;

use crate::config::Settings;

/// Default port when the bind address names only a host.
const DEFAULT_PORT: u16 = 8000;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str, migrate: bool) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    if migrate {
        println!("{} Preparing database...", style("→").cyan());
        let ctx = settings.create_db_context()?;
        match ctx.init_schema().await {
            Ok(()) => {
                println!(
                    "  {} Database ready ({})",
                    style("✓").green(),
                    settings.display_database_url()
                );
            }
            Err(e) => {
                eprintln!("  {} Schema setup failed: {}", style("✗").red(), e);
                return Err(anyhow::anyhow!("Database schema setup failed: {}", e));
            }
        }
    }

    println!(
        "{} Starting Page Analyzer at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> 127.0.0.1:8080
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8000
/// - Host and port: "0.0.0.0:8080" -> 0.0.0.0:8080
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), DEFAULT_PORT))
}
