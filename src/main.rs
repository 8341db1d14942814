mod commands;
mod context;
mod render;
mod utils;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::EventArgs;
use context::Context;

#[derive(Parser)]
#[command(name = "parishcal")]
#[command(about = "View the parish calendar and keep the website's events.json up to date")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        month: Option<String>,
    },
    /// Show every event on one day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// List upcoming events
    List,
    /// Log in as admin
    Login,
    /// End the admin session
    Logout,
    /// Manage the repository token used to sync events
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Create an event
    Add {
        #[command(flatten)]
        fields: EventArgs,
    },
    /// Change an event; omitted fields keep their current value
    Edit {
        id: i64,

        #[command(flatten)]
        fields: EventArgs,
    },
    /// Delete an event
    Delete {
        id: i64,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Write events.json for a manual upload
    Export {
        /// Directory to write into, defaults to the current directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Check a token and keep it for this session
    Set,
    /// Forget the token
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut ctx = Context::load()?;

    match cli.command {
        Commands::Month { month } => commands::month::run(&ctx, month).await,
        Commands::Day { date } => commands::day::run(&ctx, &date).await,
        Commands::List => commands::list::run(&ctx).await,
        Commands::Login => commands::login::login(&mut ctx),
        Commands::Logout => commands::login::logout(&ctx),
        Commands::Token { action } => match action {
            TokenAction::Set => commands::token::set(&mut ctx).await,
            TokenAction::Clear => commands::token::clear(&mut ctx),
        },
        Commands::Add { fields } => commands::add::run(&ctx, fields).await,
        Commands::Edit { id, fields } => commands::edit::run(&ctx, id, fields).await,
        Commands::Delete { id, yes } => commands::delete::run(&ctx, id, yes).await,
        Commands::Export { dir } => commands::export::run(&ctx, dir).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PARISHCAL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("parishcal=warn,parishcal_core=warn"));

    let format = env::var("PARISHCAL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
