//! URL and check commands.

use console::style;

use crate::config::Settings;
use crate::models::UrlCheck;
use crate::services::{RunCheckError, SubmitError, SubmitOutcome, UrlService};

fn url_service(settings: &Settings) -> anyhow::Result<UrlService> {
    let ctx = settings.create_db_context()?;
    let analyzer = settings.create_analyzer()?;
    Ok(UrlService::from_context(&ctx, analyzer))
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Submit a URL.
pub async fn cmd_add(settings: &Settings, url: &str) -> anyhow::Result<()> {
    let service = url_service(settings)?;

    match service.submit_url(Some(url)).await {
        Ok(SubmitOutcome::Created(id)) => {
            println!("{} Added URL #{}", style("✓").green(), id);
            Ok(())
        }
        Ok(SubmitOutcome::Existing(id)) => {
            println!("{} URL already exists as #{}", style("!").yellow(), id);
            Ok(())
        }
        Err(SubmitError::Invalid(e)) => {
            eprintln!("{} {}", style("✗").red(), e.message());
            Err(anyhow::anyhow!("Invalid URL: {}", url))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fetch a URL and record a check.
pub async fn cmd_check(settings: &Settings, id: i64) -> anyhow::Result<()> {
    let service = url_service(settings)?;

    match service.run_check(id).await {
        Ok(done) => {
            println!("{} Check #{} recorded", style("✓").green(), done.id);
            println!("  {:<12} {}", style("Status:").bold(), done.summary.status_code);
            println!("  {:<12} {}", style("h1:").bold(), or_dash(done.summary.h1.as_deref()));
            println!(
                "  {:<12} {}",
                style("Title:").bold(),
                or_dash(done.summary.title.as_deref())
            );
            println!(
                "  {:<12} {}",
                style("Description:").bold(),
                or_dash(done.summary.description.as_deref())
            );
            Ok(())
        }
        Err(RunCheckError::NotFound(id)) => Err(anyhow::anyhow!("URL #{} not found", id)),
        Err(e) => {
            eprintln!("{} Check failed: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}

/// List all URLs with their latest check.
pub async fn cmd_ls(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let service = url_service(settings)?;
    let listings = service.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("{} No URLs yet. Add one with `page-analyzer add <URL>`", style("!").yellow());
        return Ok(());
    }

    println!(
        "{:>6}  {:<40}  {:<20}  {}",
        style("ID").bold(),
        style("Name").bold(),
        style("Last check").bold(),
        style("Status").bold()
    );
    for listing in &listings {
        let check = listing.latest_check.as_ref();
        println!(
            "{:>6}  {:<40}  {:<20}  {}",
            listing.url.id,
            listing.url.name,
            check
                .map(|c| c.created_at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            check
                .and_then(|c| c.status_code)
                .map(|code| code.to_string())
                .unwrap_or_default()
        );
    }

    Ok(())
}

/// Show a URL and its check history.
pub async fn cmd_show(settings: &Settings, id: i64, json: bool) -> anyhow::Result<()> {
    let service = url_service(settings)?;
    let detail = service
        .detail(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("URL #{} not found", id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("{} #{}", style(&detail.url.name).bold(), detail.url.id);
    println!(
        "  Created: {}",
        detail.url.created_at.format("%Y-%m-%d %H:%M:%S")
    );

    if detail.checks.is_empty() {
        println!("  No checks yet. Run `page-analyzer check {}`", id);
        return Ok(());
    }

    println!();
    for check in &detail.checks {
        print_check(check);
    }

    Ok(())
}

fn print_check(check: &UrlCheck) {
    let status = check
        .status_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {} #{} {} [{}]",
        style("•").cyan(),
        check.id,
        check.created_at.format("%Y-%m-%d %H:%M:%S"),
        status
    );
    println!("      h1:          {}", or_dash(check.h1.as_deref()));
    println!("      title:       {}", or_dash(check.title.as_deref()));
    println!("      description: {}", or_dash(check.description.as_deref()));
}
