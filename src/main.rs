mod api;
mod cli;
mod error;
mod fmt;
mod models;
mod reconciler;
mod settings;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ClosingCommands, Commands, Context, MovementCommands};
use error::Result;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the HTTP backend from settings and run `f` against it.
fn online(api_url: Option<String>, today: NaiveDate, f: impl FnOnce(&Context) -> Result<()>) -> Result<()> {
    let mut settings = settings::load_settings();
    if let Some(url) = api_url {
        settings.api_url = settings::normalize_api_url(&url)?;
    }
    tracing::debug!(api_url = %settings.api_url, "backend configured");
    let backend = api::HttpBackend::new(&settings)?;
    f(&Context {
        backend: &backend,
        settings: &settings,
        today,
    })
}

fn run(cli: Cli) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let api_url = cli.api_url;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Init {
            url,
            registers,
            timeout,
        } => cli::init::run(&url, registers, timeout),
        Commands::Compute {
            opening,
            supplies,
            withdrawals,
            machine_count,
        } => cli::compute::run(&opening, &supplies, &withdrawals, machine_count.as_deref(), today),
        Commands::Status => online(api_url, today, cli::status::run),
        Commands::Dashboard => online(api_url, today, cli::dashboard::run),
        Commands::Register {
            id,
            date,
            machine_count,
            notes,
        } => online(api_url, today, |ctx| {
            cli::register::run(ctx, id, date, machine_count, notes)
        }),
        Commands::Movement { command } => match command {
            MovementCommands::Add {
                register,
                kind,
                description,
                amount,
                date,
            } => online(api_url, today, |ctx| {
                cli::movement::add(ctx, register, kind.into(), &description, &amount, date)
            }),
            MovementCommands::Delete {
                register,
                id,
                date,
                yes,
            } => online(api_url, today, |ctx| cli::movement::delete(ctx, register, id, date, yes)),
        },
        Commands::Closing { command } => match command {
            ClosingCommands::Save {
                register,
                date,
                machine_count,
                opening,
                notes,
            } => online(api_url, today, |ctx| {
                cli::closing::save(ctx, register, date, machine_count, opening, &notes)
            }),
        },
        Commands::Central { date } => online(api_url, today, |ctx| cli::central::run(ctx, date)),
        Commands::History {
            from_date,
            to_date,
            register,
            export,
        } => online(api_url, today, |ctx| {
            cli::history::run(ctx, from_date, to_date, register, export)
        }),
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
