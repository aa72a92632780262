pub mod central;
pub mod closing;
pub mod compute;
pub mod dashboard;
pub mod history;
pub mod init;
pub mod movement;
pub mod register;
pub mod status;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::api::Backend;
use crate::error::Result;
use crate::fmt::{money, parse_date_arg};
use crate::models::{MovementKind, ReconciliationResult, Status};
use crate::settings::Settings;

/// Everything a command needs. Passed explicitly; commands hold no state of their own.
pub struct Context<'a> {
    pub backend: &'a dyn Backend,
    pub settings: &'a Settings,
    pub today: NaiveDate,
}

impl Context<'_> {
    pub(crate) fn date(&self, arg: &Option<String>) -> Result<NaiveDate> {
        match arg {
            Some(s) => parse_date_arg(s, self.today),
            None => Ok(self.today),
        }
    }
}

pub(crate) fn status_label(status: Status) -> ColoredString {
    match status {
        Status::Ok => status.label().green().bold(),
        Status::NeedsReview => status.label().red().bold(),
        Status::Pending => status.label().yellow(),
    }
}

pub(crate) fn signed_money(val: Decimal) -> ColoredString {
    let text = money(val);
    if val > Decimal::ZERO {
        text.green()
    } else if val < Decimal::ZERO {
        text.red()
    } else {
        text.normal()
    }
}

pub(crate) fn reconciliation_table(result: &ReconciliationResult, opening: Decimal) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![Cell::new("Opening balance"), Cell::new(money(opening))]);
    table.add_row(vec![
        Cell::new("Supplies"),
        Cell::new(money(result.total_supplies).green()),
    ]);
    table.add_row(vec![
        Cell::new("Withdrawals"),
        Cell::new(money(result.total_withdrawals).red()),
    ]);
    table.add_row(vec![
        Cell::new("Computed balance".bold()),
        Cell::new(money(result.computed_balance)),
    ]);
    table.add_row(vec![Cell::new("Variance"), Cell::new(signed_money(result.variance))]);
    table.add_row(vec![Cell::new("Status"), Cell::new(status_label(result.status))]);
    table
}

#[derive(Parser)]
#[command(name = "caixa", about = "Cash-register reconciliation client.")]
pub struct Cli {
    /// Override the API base URL from settings
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    #[value(alias = "suprimento")]
    Supply,
    #[value(alias = "sangria")]
    Withdrawal,
}

impl From<KindArg> for MovementKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Supply => MovementKind::Supply,
            KindArg::Withdrawal => MovementKind::Withdrawal,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Point caixa at a backend and write the settings file.
    Init {
        /// API base URL, e.g. http://localhost:5000/api/loteria
        url: String,
        /// Number of registers tracked by the backend
        #[arg(long)]
        registers: Option<u32>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Show settings and check that the backend answers.
    Status,
    /// Today's totals and the status of every register.
    Dashboard,
    /// Movements and live reconciliation for one register-day.
    Register {
        /// Register number
        id: u32,
        /// Date: YYYY-MM-DD, 'today', or an offset like -1
        #[arg(long, allow_hyphen_values = true)]
        date: Option<String>,
        /// Machine count to reconcile against (not saved)
        #[arg(long = "machine-count", allow_hyphen_values = true)]
        machine_count: Option<String>,
        /// Notes to show with the reconciliation (not saved)
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add or remove supplies and withdrawals.
    Movement {
        #[command(subcommand)]
        command: MovementCommands,
    },
    /// Save closing reports.
    Closing {
        #[command(subcommand)]
        command: ClosingCommands,
    },
    /// Consolidated view of all registers for a day.
    Central {
        #[arg(long, allow_hyphen_values = true)]
        date: Option<String>,
    },
    /// Closing reports over a period.
    History {
        /// Start date: YYYY-MM-DD
        #[arg(long = "from", allow_hyphen_values = true)]
        from_date: Option<String>,
        /// End date: YYYY-MM-DD
        #[arg(long = "to", allow_hyphen_values = true)]
        to_date: Option<String>,
        /// Only this register
        #[arg(long)]
        register: Option<u32>,
        /// Write the listing to a CSV file
        #[arg(long)]
        export: Option<String>,
    },
    /// Reconcile amounts given on the command line, without the backend.
    Compute {
        /// Opening balance
        #[arg(long, allow_hyphen_values = true)]
        opening: String,
        /// Supply amount (repeatable)
        #[arg(long = "supply")]
        supplies: Vec<String>,
        /// Withdrawal amount (repeatable)
        #[arg(long = "withdrawal")]
        withdrawals: Vec<String>,
        /// Physical machine count
        #[arg(long = "machine-count", allow_hyphen_values = true)]
        machine_count: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MovementCommands {
    /// Record a supply or withdrawal.
    Add {
        /// Register number
        register: u32,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long, default_value = "")]
        description: String,
        /// Amount, e.g. 150.00 or 1.234,56
        #[arg(long, default_value = "")]
        amount: String,
        #[arg(long, allow_hyphen_values = true)]
        date: Option<String>,
    },
    /// Remove a movement.
    Delete {
        /// Register number
        register: u32,
        /// Movement ID (shown in `caixa register`)
        id: i64,
        /// Date of the register-day to show afterwards
        #[arg(long, allow_hyphen_values = true)]
        date: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ClosingCommands {
    /// Save (or overwrite) the closing report of a register-day.
    Save {
        /// Register number
        register: u32,
        #[arg(long, allow_hyphen_values = true)]
        date: Option<String>,
        /// Physically counted cash
        #[arg(long = "machine-count", allow_hyphen_values = true)]
        machine_count: Option<String>,
        /// Opening balance (default: the server's value for the day)
        #[arg(long, allow_hyphen_values = true)]
        opening: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
}
