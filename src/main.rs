mod colors;
mod commands;
mod fetch;
mod prompt;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use schaukasten_core::{Config, Language, Window};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schaukasten")]
#[command(about = "Weekly overview of the events in a bilingual iCalendar feed")]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Events of one ISO week (default: the current week)
    Week {
        /// ISO year, or the week number when given alone
        year: Option<i32>,

        /// ISO week number
        #[arg(value_parser = clap::value_parser!(u32).range(1..=53))]
        week: Option<u32>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Events between two dates
    Range {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the config file, creating it if needed
    Config,
}

#[derive(Args)]
struct OutputArgs {
    /// Calendar feed to read (http, https or webcal)
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,

    /// Read the calendar from a local .ics file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Only show this language (de, en)
    #[arg(long)]
    lang: Option<Language>,

    /// Print the localized events as JSON
    #[arg(long)]
    json: bool,

    /// Skip the exclusion prompt
    #[arg(short, long)]
    yes: bool,
}

impl From<OutputArgs> for commands::overview::Options {
    fn from(args: OutputArgs) -> Self {
        commands::overview::Options {
            url: args.url,
            file: args.file,
            language: args.lang,
            json: args.json,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Week { year, week, output } => {
            let config = Config::load()?;
            let window = match (year, week) {
                (Some(year), Some(week)) => Window::iso_week(year, week)?,
                (Some(week), None) => {
                    let week = u32::try_from(week)
                        .map_err(|_| anyhow::anyhow!("Invalid week number: {}", week))?;
                    let today = Utc::now().with_timezone(&config.timezone()?).date_naive();
                    let (year, _) = Window::week_of(today).iso_week_number();
                    Window::iso_week(year, week)?
                }
                _ => {
                    let today = Utc::now().with_timezone(&config.timezone()?).date_naive();
                    Window::week_of(today)
                }
            };
            commands::overview::run(&config, window, output.into()).await
        }
        Commands::Range { from, to, output } => {
            let config = Config::load()?;
            let window = Window::from_args(&from, &to)?;
            commands::overview::run(&config, window, output.into()).await
        }
        Commands::Config => commands::config::run(),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
