use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{status_label, Context};
use crate::error::Result;
use crate::fmt::{date_br, money};

pub fn run(ctx: &Context) -> Result<()> {
    let dashboard = ctx.backend.dashboard()?;
    let totals = &dashboard.totals;

    let mut summary = Table::new();
    summary.set_header(vec!["Supplies", "Withdrawals", "Total balance", "Registers to review"]);
    let problems = if totals.problem_count > 0 {
        totals.problem_count.to_string().red().bold()
    } else {
        totals.problem_count.to_string().green()
    };
    summary.add_row(vec![
        Cell::new(money(totals.supplies)),
        Cell::new(money(totals.withdrawals)),
        Cell::new(money(totals.total_balance)),
        Cell::new(problems),
    ]);
    println!("Dashboard {}\n{summary}", date_br(dashboard.date));

    let mut table = Table::new();
    table.set_header(vec!["Register", "Balance", "Status"]);
    for r in &dashboard.registers {
        table.add_row(vec![
            Cell::new(format!("Caixa {}", r.register)),
            Cell::new(money(r.computed_balance)),
            Cell::new(status_label(r.status)),
        ]);
    }
    println!("\nRegisters\n{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fake::FakeBackend;
    use crate::settings::Settings;
    use chrono::NaiveDate;

    #[test]
    fn test_dashboard_fetches_once() {
        let backend = FakeBackend::default();
        let settings = Settings::default();
        let ctx = Context {
            backend: &backend,
            settings: &settings,
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };
        run(&ctx).unwrap();
        assert_eq!(backend.calls(), vec!["dashboard"]);
    }

    #[test]
    fn test_dashboard_api_failure_is_terminal() {
        let backend = FakeBackend {
            fail_with: Some("database is locked".to_string()),
            ..FakeBackend::default()
        };
        let settings = Settings::default();
        let ctx = Context {
            backend: &backend,
            settings: &settings,
            today: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };
        let err = run(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "database is locked");
        assert_eq!(backend.calls().len(), 1);
    }
}
