use std::path::Path;

use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::cli::{signed_money, status_label, Context};
use crate::error::{CaixaError, Result};
use crate::fmt::{date_br, money, parse_date_arg};
use crate::models::{ClosingReport, HistoryFilter};
use crate::reconciler;

#[derive(Serialize)]
struct ExportRow {
    date: String,
    register: u32,
    opening_balance: String,
    total_supplies: String,
    total_withdrawals: String,
    computed_balance: String,
    machine_count: String,
    variance: String,
    status: &'static str,
    notes: String,
}

impl From<&ClosingReport> for ExportRow {
    fn from(r: &ClosingReport) -> Self {
        Self {
            date: r.date.format("%Y-%m-%d").to_string(),
            register: r.register,
            opening_balance: r.opening_balance.round_dp(2).to_string(),
            total_supplies: r.total_supplies.round_dp(2).to_string(),
            total_withdrawals: r.total_withdrawals.round_dp(2).to_string(),
            computed_balance: r.computed_balance.round_dp(2).to_string(),
            machine_count: r.machine_count.round_dp(2).to_string(),
            variance: r.variance.round_dp(2).to_string(),
            status: reconciler::classify(r.variance).label(),
            notes: r.notes.clone().unwrap_or_default(),
        }
    }
}

pub fn build_filter(
    ctx: &Context,
    from_date: Option<String>,
    to_date: Option<String>,
    register: Option<u32>,
) -> Result<HistoryFilter> {
    let from = from_date.as_deref().map(|d| parse_date_arg(d, ctx.today)).transpose()?;
    let to = to_date.as_deref().map(|d| parse_date_arg(d, ctx.today)).transpose()?;
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(CaixaError::Validation(format!(
                "--from ({f}) is after --to ({t})"
            )));
        }
    }
    if let Some(r) = register {
        ctx.settings.check_register(r)?;
    }
    Ok(HistoryFilter { from, to, register })
}

/// Write closing reports as CSV. Amounts are plain decimals, not currency text.
pub fn write_csv(rows: &[ClosingReport], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(ExportRow::from(r))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(
    ctx: &Context,
    from_date: Option<String>,
    to_date: Option<String>,
    register: Option<u32>,
    export: Option<String>,
) -> Result<()> {
    let filter = build_filter(ctx, from_date, to_date, register)?;
    let rows = ctx.backend.history(&filter)?;

    let mut table = Table::new();
    table.set_header(vec![
        "Date",
        "Register",
        "Opening",
        "Supplies",
        "Withdrawals",
        "Machine",
        "Variance",
        "Status",
    ]);
    for r in &rows {
        table.add_row(vec![
            Cell::new(date_br(r.date)),
            Cell::new(format!("Caixa {}", r.register)),
            Cell::new(money(r.opening_balance)),
            Cell::new(money(r.total_supplies)),
            Cell::new(money(r.total_withdrawals)),
            Cell::new(money(r.machine_count)),
            Cell::new(signed_money(r.variance)),
            Cell::new(status_label(reconciler::classify(r.variance))),
        ]);
    }
    println!("History ({} closings)\n{table}", rows.len());

    if let Some(path) = export {
        write_csv(&rows, Path::new(&path))?;
        println!("Wrote {path}");
    }
    Ok(())
}
