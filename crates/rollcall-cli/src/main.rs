use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rollcall", about = "Rollcall attendance CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize a face image and mark attendance if it clears the threshold
    Recognize {
        /// Path to the image file
        image: PathBuf,
    },
    /// Show total attendance across all recorded days
    Total,
    /// Show attendance totals for one user
    User {
        /// Username to look up
        name: String,
    },
    /// Show who was present on a given date
    Daily {
        /// Date in YYYY-MM-DD form
        date: String,
    },
    /// Show a user's per-date attendance history
    History {
        /// Username to look up
        name: String,
    },
    /// Show daemon status
    Status,
}

#[zbus::proxy(
    interface = "org.freedesktop.Rollcall1",
    default_service = "org.freedesktop.Rollcall1",
    default_path = "/org/freedesktop/Rollcall1"
)]
trait Rollcall {
    async fn recognize(&self, image_base64: &str) -> zbus::Result<String>;
    async fn total_attendance(&self) -> zbus::Result<String>;
    async fn user_attendance(&self, name: &str) -> zbus::Result<String>;
    async fn daily_attendance(&self, date: &str) -> zbus::Result<String>;
    async fn user_history(&self, name: &str) -> zbus::Result<String>;
    async fn status(&self) -> zbus::Result<String>;
}

/// Re-indent the daemon's JSON reply for terminal output. Falls back to
/// the raw string if the reply is not valid JSON.
fn print_reply(reply: &str) {
    match serde_json::from_str::<serde_json::Value>(reply) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{reply}"),
        },
        Err(_) => println!("{reply}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let conn = zbus::Connection::session()
        .await
        .context("connecting to the session bus")?;
    let proxy = RollcallProxy::new(&conn)
        .await
        .context("reaching rollcalld")?;

    match cli.command {
        Commands::Recognize { image } => {
            let bytes = std::fs::read(&image)
                .with_context(|| format!("reading image {}", image.display()))?;
            let payload = BASE64.encode(bytes);
            let reply = proxy.recognize(&payload).await?;
            print_reply(&reply);
        }
        Commands::Total => {
            let reply = proxy.total_attendance().await?;
            print_reply(&reply);
        }
        Commands::User { name } => {
            let reply = proxy.user_attendance(&name).await?;
            print_reply(&reply);
        }
        Commands::Daily { date } => {
            if rollcall_core::record::parse_day(&date).is_none() {
                anyhow::bail!("bad date {date:?}: expected YYYY-MM-DD");
            }
            let reply = proxy.daily_attendance(&date).await?;
            print_reply(&reply);
        }
        Commands::History { name } => {
            let reply = proxy.user_history(&name).await?;
            print_reply(&reply);
        }
        Commands::Status => {
            let reply = proxy.status().await?;
            print_reply(&reply);
        }
    }

    Ok(())
}
