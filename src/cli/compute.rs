use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cli::reconciliation_table;
use crate::error::{CaixaError, Result};
use crate::fmt::parse_amount;
use crate::models::{Movement, MovementKind, ReconciliationResult, RegisterDaySnapshot};
use crate::reconciler;

fn positive(input: &str) -> Result<Decimal> {
    let amount = parse_amount(input)?;
    if amount <= Decimal::ZERO {
        return Err(CaixaError::Validation(format!(
            "Movement amounts must be greater than zero: {input}"
        )));
    }
    Ok(amount)
}

/// Build an ad-hoc snapshot from typed amounts and reconcile it.
pub fn compute(
    opening: &str,
    supplies: &[String],
    withdrawals: &[String],
    machine_count: Option<&str>,
    date: NaiveDate,
) -> Result<(RegisterDaySnapshot, ReconciliationResult)> {
    let opening_balance = parse_amount(opening)?;
    let tagged = supplies
        .iter()
        .map(|s| (MovementKind::Supply, s))
        .chain(withdrawals.iter().map(|s| (MovementKind::Withdrawal, s)));

    let mut movements = Vec::new();
    for (i, (kind, raw)) in tagged.enumerate() {
        movements.push(Movement {
            id: i as i64 + 1,
            kind,
            description: String::new(),
            amount: Some(positive(raw)?),
            date,
            register: 0,
            order: i as i64 + 1,
            timestamp: None,
        });
    }

    let snapshot = RegisterDaySnapshot {
        register_id: 0,
        date,
        opening_balance,
        movements,
        machine_count: machine_count.map(parse_amount).transpose()?,
        notes: None,
    };
    let result = reconciler::reconcile(&snapshot);
    Ok((snapshot, result))
}

pub fn run(
    opening: &str,
    supplies: &[String],
    withdrawals: &[String],
    machine_count: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let (snapshot, result) = compute(opening, supplies, withdrawals, machine_count, today)?;
    println!(
        "Reconciliation\n{}",
        reconciliation_table(&result, snapshot.opening_balance)
    );
    Ok(())
}
