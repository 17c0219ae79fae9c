use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use habit_streak::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "habit-streak")]
#[command(about = "Habit tracker - daily completions, streaks and experience levels")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.habit-streak/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON API (default)
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write the default config file
    Init {
        #[arg(long)]
        force: bool,
    },

    /// Show users and habit streaks from the local database
    Status {
        /// Only this user (email or username)
        #[arg(long)]
        user: Option<String>,
    },

    /// Check that the configured server is reachable
    Ping,

    /// Mark a habit complete through the running server
    Complete {
        habit_id: i64,

        /// Day or timestamp (default: today)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let load_config = || Config::load(cli.config.as_deref());

    match cli.command {
        Some(Commands::Serve { port }) => {
            cli::serve::serve_command(load_config()?, port).await?;
        }
        Some(Commands::Init { force }) => {
            cli::init::init_command(cli.config.clone(), force)?;
        }
        Some(Commands::Status { user }) => {
            cli::status::status_command(&load_config()?, user)?;
        }
        Some(Commands::Ping) => {
            cli::remote::ping_command(&load_config()?)?;
        }
        Some(Commands::Complete {
            habit_id,
            date,
            notes,
        }) => {
            cli::remote::complete_command(&load_config()?, habit_id, date, notes)?;
        }
        None => {
            // Default: run the API
            cli::serve::serve_command(load_config()?, None).await?;
        }
    }

    Ok(())
}
