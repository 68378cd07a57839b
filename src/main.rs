mod board;
mod card;
mod config;
mod dropdown;
mod filter;
mod keywords;
mod locations;
mod models;
mod pages;
mod store;
mod tui;
mod variant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use board::{Board, Control};
use config::Config;
use models::Job;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use store::{JobStore, SnapshotStore, SupabaseStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use variant::PageVariant;

#[derive(Parser)]
#[command(name = "gavel")]
#[command(about = "Gavel - browse the latest legal job postings")]
struct Cli {
    /// Read jobs from a JSON export instead of the hosted table
    #[arg(long, global = true)]
    from_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse postings interactively (default)
    Browse {
        /// Filter layout to use
        #[arg(long, value_enum, default_value_t = PageVariant::States)]
        variant: PageVariant,
    },

    /// Print postings that pass the filters
    List {
        /// Filter layout to use
        #[arg(long, value_enum, default_value_t = PageVariant::States)]
        variant: PageVariant,

        /// Free-text search over title, company, location, type, category and description
        #[arg(short, long)]
        search: Option<String>,

        /// Location (states and minimal variants)
        #[arg(short, long)]
        location: Option<String>,

        /// Country (geo variant)
        #[arg(long)]
        country: Option<String>,

        /// Region within the country (geo variant)
        #[arg(long)]
        region: Option<String>,

        /// City within the region (geo variant)
        #[arg(long)]
        city: Option<String>,

        /// Job type, e.g. full-time, part-time, contract
        #[arg(short = 't', long)]
        job_type: Option<String>,

        /// Category (exact match, case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Output JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// List the categories the category filter offers
    Categories {
        /// Filter layout to use
        #[arg(long, value_enum, default_value_t = PageVariant::States)]
        variant: PageVariant,
    },

    /// About Gavel
    About,

    /// How to reach us
    Contact,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "gavel=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        // The TUI owns the terminal, so log to a file
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

fn open_store(config: &Config, from_file: Option<PathBuf>) -> Result<Arc<dyn JobStore>> {
    match from_file {
        Some(path) => Ok(Arc::new(SnapshotStore::new(path))),
        None => Ok(Arc::new(SupabaseStore::new(config.require_supabase()?))),
    }
}

fn flag(control: Control) -> &'static str {
    match control {
        Control::Location => "--location",
        Control::Country => "--country",
        Control::Region => "--region",
        Control::City => "--city",
        Control::JobType => "--job-type",
        Control::Category => "--category",
    }
}

/// Applies command-line choices the way the page applies dropdown picks,
/// so values must be ones the page would offer. Order matters for the geo
/// cascade: country, then region, then city.
fn apply_selections(
    board: &mut Board,
    variant: PageVariant,
    selections: Vec<(Control, Option<String>)>,
) -> Result<()> {
    for (control, value) in selections {
        let Some(value) = value else {
            continue;
        };
        if board.dropdown(control).is_none() {
            bail!("{} is not available for the {} variant", flag(control), variant.name());
        }
        board.select_value(control, &value);
        let selected = board.dropdown(control).map_or("", |d| d.value());
        if !selected.eq_ignore_ascii_case(&value) {
            bail!("'{}' is not a valid {} choice", value, flag(control));
        }
    }
    Ok(())
}

fn print_results(out: &mut impl Write, jobs: &[&Job], json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(jobs)?)?;
        return Ok(());
    }

    writeln!(out, "{} ({})", pages::SECTION_TITLE, jobs.len())?;
    writeln!(out, "{}", "-".repeat(72))?;
    if jobs.is_empty() {
        writeln!(out, "{}", card::NO_RESULTS)?;
        return Ok(());
    }
    for job in jobs {
        write!(out, "{}", card::JobCard::new(job).to_text(72))?;
        writeln!(out, "{}", "-".repeat(72))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let command = cli.command.unwrap_or(Commands::Browse {
        variant: PageVariant::default(),
    });

    match command {
        Commands::Browse { variant } => {
            init_logging(Some(&config.log_file))?;
            let store = open_store(&config, cli.from_file)?;
            tracing::info!(variant = variant.name(), "starting board");

            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || tui::run_browse(store, variant, runtime)).await??;
        }

        Commands::List {
            variant,
            search,
            location,
            country,
            region,
            city,
            job_type,
            category,
            json,
        } => {
            init_logging(None)?;
            let store = open_store(&config, cli.from_file)?;

            tracing::info!(source = %store.describe(), variant = variant.name(), "fetching jobs");
            let mut board = Board::new(variant);
            board.on_fetch(store.fetch_jobs().await);

            if let Some(error) = board.error() {
                eprintln!("{}", error);
                print_results(&mut std::io::stdout().lock(), &[], json)?;
                return Ok(ExitCode::FAILURE);
            }

            apply_selections(
                &mut board,
                variant,
                vec![
                    (Control::Location, location),
                    (Control::Country, country),
                    (Control::Region, region),
                    (Control::City, city),
                    (Control::JobType, job_type),
                    (Control::Category, category),
                ],
            )?;
            for c in search.unwrap_or_default().chars() {
                board.push_search(c);
            }

            print_results(&mut std::io::stdout().lock(), &board.visible(), json)?;
        }

        Commands::Categories { variant } => {
            init_logging(None)?;
            let store = open_store(&config, cli.from_file)?;
            let mut board = Board::new(variant);
            board.on_fetch(store.fetch_jobs().await);
            if let Some(error) = board.error() {
                bail!("{}", error);
            }

            match board.dropdown(Control::Category) {
                Some(dropdown) if dropdown.entry_count() > 1 => {
                    for entry in 1..dropdown.entry_count() {
                        println!("{}", dropdown.entry_label(entry));
                    }
                }
                _ => println!("No categories found."),
            }
        }

        Commands::About => print!("{}", pages::ABOUT.to_text(72)),

        Commands::Contact => print!("{}", pages::CONTACT.to_text(72)),
    }

    Ok(ExitCode::SUCCESS)
}
