//! Print the announcements feed a given role currently sees.
//!
//! Usage: announcements --role student [--url URL] [--json]
//!   --role ROLE  : student | admin | teacher | anything else (everyone only)
//!   --url URL    : ERP endpoint (defaults to ANNOUNCEMENTS_URL)
//!   --json       : print the feed as JSON instead of a table

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use academy_feed::models::role::ViewerRole;
use academy_feed::services::{
    announcements::AnnouncementService, formatter::AnnouncementFormatter, http::ReqwestClient,
};

#[derive(Parser)]
#[command(name = "announcements", about = "Show the announcements feed for a viewer role")]
struct Args {
    /// Viewer role (case-insensitive)
    #[arg(long, default_value = "student")]
    role: String,

    /// Announcements endpoint
    #[arg(long, env = "ANNOUNCEMENTS_URL")]
    url: String,

    /// Admission window in calendar months
    #[arg(long, env = "ANNOUNCEMENT_WINDOW_MONTHS", default_value_t = 6)]
    months: u32,

    /// Request timeout in seconds (none by default)
    #[arg(long, env = "HTTP_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Display offset in minutes east of UTC
    #[arg(long, env = "DISPLAY_UTC_OFFSET_MINUTES", default_value_t = 0, allow_negative_numbers = true)]
    offset_minutes: i32,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let role = ViewerRole::parse(&args.role);

    let client = ReqwestClient::new(args.timeout.map(Duration::from_secs))?;
    let feed = AnnouncementService::new(Arc::new(client), args.url)
        .with_window_months(args.months)
        .with_formatter(AnnouncementFormatter::from_offset_minutes(args.offset_minutes));

    tracing::info!("Fetching announcements for role '{}' from {}", role, feed.url());

    let items = match feed.get_for_user(&role).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(ExitCode::SUCCESS);
    }

    if items.is_empty() {
        println!("No announcements for {}", role.label());
        return Ok(ExitCode::SUCCESS);
    }

    for item in &items {
        let badge = if item.is_recent { " [NEW]" } else { "" };
        println!(
            "P{} {:<14} {}{}",
            item.priority_level, item.formatted_date, item.announcement.subject, badge
        );
        println!(
            "   {} · {}",
            item.announcement.audience.as_deref().unwrap_or("-"),
            item.formatted_date_time
        );
        if !item.announcement.body.is_empty() {
            println!("   {}", item.announcement.body);
        }
    }
    println!("{} announcement(s), {} new", items.len(), items.iter().filter(|a| a.is_recent).count());

    Ok(ExitCode::SUCCESS)
}
