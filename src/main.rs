use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod context;
mod format;
mod insights;
mod models;
mod provider;
mod recommend;
mod server;
mod windows;

#[derive(Parser)]
#[command(name = "campus-intelligence")]
#[command(about = "Contextual intelligence engine for the CampusLife dashboard", long_about = None)]
struct Cli {
    /// Snapshot JSON file; the built-in sample snapshot is used when omitted
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    /// Evaluation instant as RFC 3339; defaults to the current time
    #[arg(long, global = true)]
    now: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derived context snapshot
    Context,
    /// Print the prioritized insight feed
    Insights {
        #[arg(long, default_value_t = insights::DEFAULT_FEED_LIMIT)]
        limit: usize,
    },
    /// Print the scored recommendation list as JSON
    Recommend,
    /// Print today's class and meal windows
    Schedule,
    /// Serve the recommendation API over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let now = match cli.now.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .context("--now must be an RFC 3339 timestamp")?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let snapshot = provider::load_snapshot(cli.snapshot.as_deref(), now)?;

    match cli.command {
        Commands::Context => {
            let ctx = context::build_context(&snapshot, now);
            println!("{}", format::greeting(&snapshot.student_name, ctx.hour_of_day));
            println!("{}", format::status_line(&ctx));
            println!("{}", serde_json::to_string_pretty(&ctx)?);
        }
        Commands::Insights { limit } => {
            let ctx = context::build_context(&snapshot, now);
            let all = insights::generate_insights(&snapshot, &ctx, now);
            let feed = insights::feed(&all, limit);

            if feed.is_empty() {
                println!("All clear: nothing needs your attention right now.");
                return Ok(());
            }

            println!("Top insights ({} of {}):", feed.len(), all.len());
            for insight in &feed {
                println!("- [{}] {}", insight.priority, insight.title);
                println!("  {}", insight.description);
            }
        }
        Commands::Recommend => {
            let response = recommend::respond(&snapshot, now);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Schedule => {
            let schedule = windows::today_schedule(&snapshot.timetable, now);
            let meals = windows::current_meal(&snapshot.meals, now);

            match &schedule.current {
                Some(class) => println!(
                    "Now: {} in {} until {}",
                    class.subject,
                    class.room,
                    class.end_time.format("%H:%M")
                ),
                None => println!("No class in session."),
            }
            for class in &schedule.upcoming {
                println!(
                    "- {} {} in {} at {}",
                    class.code,
                    class.subject,
                    class.room,
                    class.start_time.format("%H:%M")
                );
            }
            println!("{} classes done today.", schedule.past.len());

            match (&meals.current, &meals.next) {
                (Some(meal), _) => println!(
                    "Mess: {:?} open until {}",
                    meal.kind,
                    meal.end_time.format("%H:%M")
                ),
                (None, Some(meal)) => println!(
                    "Mess: next is {:?} at {}",
                    meal.kind,
                    meal.start_time.format("%H:%M")
                ),
                (None, None) => println!("Mess: no meal windows left today."),
            }
        }
        Commands::Serve { addr } => {
            server::serve(snapshot, addr).await?;
        }
    }

    Ok(())
}
