use rust_decimal::Decimal;

use crate::models::{Movement, MovementKind, ReconciliationResult, RegisterDaySnapshot, Status};

/// Largest absolute variance, in currency units, still classified as OK.
pub const TOLERANCE: Decimal = Decimal::TEN;

const CURRENCY_SCALE: u32 = 2;

/// Sum the amounts of every movement of `kind`. Movements with a missing
/// amount contribute zero.
pub fn sum_by_kind(movements: &[Movement], kind: MovementKind) -> Decimal {
    movements
        .iter()
        .filter(|m| m.kind == kind)
        .map(|m| {
            m.amount.unwrap_or_else(|| {
                tracing::warn!(movement_id = m.id, "movement has no numeric amount, counting as zero");
                Decimal::ZERO
            })
        })
        .sum()
}

pub fn compute_balance(opening: Decimal, supplies: Decimal, withdrawals: Decimal) -> Decimal {
    (opening + supplies - withdrawals).round_dp(CURRENCY_SCALE)
}

/// `machine_count - computed`. An absent machine count counts as zero.
pub fn compute_variance(machine_count: Option<Decimal>, computed: Decimal) -> Decimal {
    (machine_count.unwrap_or(Decimal::ZERO) - computed).round_dp(CURRENCY_SCALE)
}

pub fn classify(variance: Decimal) -> Status {
    if variance.abs() <= TOLERANCE {
        Status::Ok
    } else {
        Status::NeedsReview
    }
}

/// Run the full reconciliation for one register-day.
///
/// Without a machine count the variance is still reported (as `-computed`)
/// but the status is `Pending`: nothing has been counted yet.
pub fn reconcile(snapshot: &RegisterDaySnapshot) -> ReconciliationResult {
    let total_supplies = sum_by_kind(&snapshot.movements, MovementKind::Supply);
    let total_withdrawals = sum_by_kind(&snapshot.movements, MovementKind::Withdrawal);
    let computed_balance =
        compute_balance(snapshot.opening_balance, total_supplies, total_withdrawals);
    let variance = compute_variance(snapshot.machine_count, computed_balance);
    let status = match snapshot.machine_count {
        Some(_) => classify(variance),
        None => Status::Pending,
    };

    ReconciliationResult {
        total_supplies,
        total_withdrawals,
        computed_balance,
        variance,
        status,
    }
}
