use comfy_table::{Cell, Table};

use crate::cli::{signed_money, status_label, Context};
use crate::error::Result;
use crate::fmt::{date_br, money};

pub fn run(ctx: &Context, date: Option<String>) -> Result<()> {
    let date = ctx.date(&date)?;
    let central = ctx.backend.central(date)?;
    let c = &central.consolidation;

    let mut summary = Table::new();
    summary.set_header(vec![
        "Supplies",
        "Withdrawals",
        "Total balance",
        "Registers to review",
        "Largest variance",
    ]);
    summary.add_row(vec![
        Cell::new(money(c.total_supplies)),
        Cell::new(money(c.total_withdrawals)),
        Cell::new(money(c.total_balance)),
        Cell::new(c.problem_count),
        Cell::new(money(c.largest_variance)),
    ]);
    println!("Central {}\n{summary}", date_br(central.date));

    let mut table = Table::new();
    table.set_header(vec![
        "Register",
        "Opening",
        "Supplies",
        "Withdrawals",
        "Computed",
        "Machine",
        "Variance",
        "Status",
    ]);
    for r in &central.registers {
        table.add_row(vec![
            Cell::new(format!("Caixa {}", r.register)),
            Cell::new(money(r.opening_balance)),
            Cell::new(money(r.total_supplies)),
            Cell::new(money(r.total_withdrawals)),
            Cell::new(money(r.computed_balance)),
            Cell::new(money(r.machine_count)),
            Cell::new(signed_money(r.variance)),
            Cell::new(status_label(r.status)),
        ]);
    }
    println!("\n{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fake::FakeBackend;
    use crate::settings::Settings;
    use chrono::NaiveDate;

    #[test]
    fn test_central_passes_date() {
        let backend = FakeBackend::default();
        let settings = Settings::default();
        let ctx = Context {
            backend: &backend,
            settings: &settings,
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };
        run(&ctx, Some("2025-01-03".to_string())).unwrap();
        assert_eq!(backend.calls(), vec!["central 2025-01-03"]);
    }

    #[test]
    fn test_central_invalid_date() {
        let backend = FakeBackend::default();
        let settings = Settings::default();
        let ctx = Context {
            backend: &backend,
            settings: &settings,
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };
        assert!(run(&ctx, Some("ontem".to_string())).is_err());
        assert!(backend.calls().is_empty());
    }
}
