use anyhow::{Context, Result};
use bookmark_admin::{AppConfig, Application};
use bookmark_manager_core::{Bookmark, BookmarkFilter, BookmarkId, BookmarkPage};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage bookmarked web pages
#[derive(Debug, Parser)]
#[command(name = "bookmark-admin", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides the configuration)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a page and store it as a bookmark
    Add { url: String },
    /// List bookmarks, newest first
    List {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long)]
        favicon: Option<String>,
        /// Created at or after this date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        after: Option<DateTime<Utc>>,
        /// Created at or before this date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        before: Option<DateTime<Utc>>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show one bookmark
    Show { id: BookmarkId },
    /// Point a bookmark at a new URL and refresh its metadata
    Edit { id: BookmarkId, url: String },
    /// Delete a bookmark
    Delete { id: BookmarkId },
    /// Show database and error statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::from_env(),
    };
    if let Some(database) = cli.database.clone() {
        config.database_path = Some(database);
    }

    let app = Application::new(config).await?;

    match cli.command {
        Command::Add { url } => {
            let bookmark = app.add_bookmark(&url).await?;
            print_bookmark(&bookmark, cli.json)?;
        }
        Command::List { url, title, description, keywords, favicon, after, before, page } => {
            let filter = BookmarkFilter {
                url_contains: url,
                title_contains: title,
                favicon_contains: favicon,
                description_contains: description,
                keywords_contains: keywords,
                created_after: after,
                created_before: before,
            };
            let listing = app.list_bookmarks(&filter, page).await?;
            print_listing(&listing, cli.json)?;
        }
        Command::Show { id } => {
            let bookmark = app.show_bookmark(id).await?;
            print_bookmark(&bookmark, cli.json)?;
        }
        Command::Edit { id, url } => {
            let bookmark = app.edit_bookmark(id, &url).await?;
            print_bookmark(&bookmark, cli.json)?;
        }
        Command::Delete { id } => {
            app.delete_bookmark(id).await?;
            println!("Deleted bookmark {}", id);
        }
        Command::Stats => {
            let stats = app.get_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

/// A bare date means midnight UTC
fn parse_date(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| format!("expected YYYY-MM-DD or an RFC 3339 timestamp, got '{}'", raw))
}

fn print_bookmark(bookmark: &Bookmark, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(bookmark)?);
        return Ok(());
    }

    let none = "-";
    println!("id:          {}", bookmark.id);
    println!("created:     {}", bookmark.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("url:         {}", bookmark.url);
    println!("title:       {}", bookmark.metadata.title);
    println!("favicon:     {}", bookmark.metadata.favicon.as_deref().unwrap_or(none));
    println!("description: {}", bookmark.metadata.description.as_deref().unwrap_or(none));
    println!("keywords:    {}", bookmark.metadata.keywords.as_deref().unwrap_or(none));
    Ok(())
}

fn print_listing(listing: &BookmarkPage, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }

    for bookmark in &listing.items {
        println!(
            "{:>5}  {}  {}  {}",
            bookmark.id,
            bookmark.created_at.format("%Y-%m-%d"),
            bookmark.url,
            bookmark.metadata.title
        );
    }
    println!(
        "page {}/{} ({} bookmarks)",
        listing.page.number,
        listing.total_pages(),
        listing.total
    );
    Ok(())
}
