use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshelf_app::Application;
use bookshelf_kernel::Settings;

/// Authors and books REST service
#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Args)]
struct Global {
    /// Environment overlay to load (local, staging, production)
    #[arg(long, global = true, env = "BOOKSHELF_ENV")]
    env: Option<String>,

    /// Directory holding base.toml and the environment overlays
    #[arg(long, global = true, env = "BOOKSHELF_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate, then serve HTTP until Ctrl-C (default)
    Serve,
    /// Apply module migrations and schema scripts, then exit
    Migrate,
    /// Check database and cache connectivity, then exit
    Check,
}

impl Global {
    fn settings(&self) -> anyhow::Result<Settings> {
        if self.env.is_none() && self.config_dir.is_none() {
            return Settings::load();
        }

        let config_dir = self
            .config_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("config"));
        let env = self.env.as_deref().unwrap_or("local");
        Settings::load_from(&config_dir, env)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` feeds the `env` fallbacks of the global flags.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = cli
        .global
        .settings()
        .context("failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry);

    let command = cli.command.unwrap_or(Command::Serve);
    tracing::info!(env = ?settings.environment, command = ?command, "bookshelf-cli starting");

    match command {
        Command::Serve => Application::build(settings).await?.run().await,
        Command::Migrate => Application::build(settings).await?.migrate().await,
        Command::Check => bookshelf_app::check(&settings).await,
    }
}
