use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::cli::{reconciliation_table, Context};
use crate::error::{CaixaError, Result};
use crate::fmt::{date_br, money, parse_amount};
use crate::models::{MovementKind, RegisterDaySnapshot};
use crate::reconciler;

/// Fetch a fresh snapshot of one register-day.
pub fn load_snapshot(ctx: &Context, register: u32, date: chrono::NaiveDate) -> Result<RegisterDaySnapshot> {
    ctx.settings.check_register(register)?;
    let day = ctx.backend.register_day(register, date)?;
    Ok(RegisterDaySnapshot::from_register_day(day))
}

fn movements_table(snapshot: &RegisterDaySnapshot, kind: MovementKind) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Description", "Amount"]);
    for m in snapshot.movements_of(kind) {
        let amount = match m.amount {
            Some(a) => money(a),
            None => "(invalid)".yellow().to_string(),
        };
        table.add_row(vec![Cell::new(m.id), Cell::new(&m.description), Cell::new(amount)]);
    }
    table
}

/// Print movements and the reconciliation of a snapshot.
pub fn show(snapshot: &RegisterDaySnapshot) {
    println!(
        "{}",
        format!("Caixa {} - {}", snapshot.register_id, date_br(snapshot.date)).bold()
    );
    println!(
        "\nSupplies\n{}",
        movements_table(snapshot, MovementKind::Supply)
    );
    println!(
        "\nWithdrawals\n{}",
        movements_table(snapshot, MovementKind::Withdrawal)
    );

    let result = reconciler::reconcile(snapshot);
    let mut table = reconciliation_table(&result, snapshot.opening_balance);
    let count = snapshot
        .machine_count
        .map(money)
        .unwrap_or_else(|| "(not counted)".to_string());
    table.add_row(vec![Cell::new("Machine count"), Cell::new(count)]);
    println!("\nReconciliation\n{table}");

    if let Some(notes) = &snapshot.notes {
        println!("Notes: {notes}");
    }
}

/// Fetch a register-day and overlay a machine count and notes entered
/// locally. The overlay is never sent to the backend.
pub fn live_snapshot(
    ctx: &Context,
    register: u32,
    date: chrono::NaiveDate,
    machine_count: Option<&str>,
    notes: Option<&str>,
) -> Result<RegisterDaySnapshot> {
    let local_count: Option<Decimal> = machine_count.map(parse_amount).transpose()?;
    if local_count.is_some_and(|c| c < Decimal::ZERO) {
        return Err(CaixaError::Validation(
            "Machine count cannot be negative".to_string(),
        ));
    }

    let mut snapshot = load_snapshot(ctx, register, date)?;
    if local_count.is_some() {
        snapshot.machine_count = local_count;
    }
    if let Some(n) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        snapshot.notes = Some(n.to_string());
    }
    Ok(snapshot)
}

pub fn run(
    ctx: &Context,
    register: u32,
    date: Option<String>,
    machine_count: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let date = ctx.date(&date)?;
    let snapshot = live_snapshot(ctx, register, date, machine_count.as_deref(), notes.as_deref())?;
    show(&snapshot);
    Ok(())
}
