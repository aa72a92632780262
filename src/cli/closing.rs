use colored::Colorize;
use rust_decimal::Decimal;

use crate::cli::register::{load_snapshot, show};
use crate::cli::{status_label, Context};
use crate::error::{CaixaError, Result};
use crate::fmt::{date_br, money, parse_amount};
use crate::models::ClosingRequest;
use crate::reconciler;

pub fn save(
    ctx: &Context,
    register: u32,
    date: Option<String>,
    machine_count: Option<String>,
    opening: Option<String>,
    notes: &str,
) -> Result<()> {
    ctx.settings.check_register(register)?;
    let date = ctx.date(&date)?;

    let machine_count = match machine_count.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => parse_amount(s)?,
        _ => {
            return Err(CaixaError::Validation(
                "Machine count is required to save a closing (--machine-count)".to_string(),
            ))
        }
    };
    if machine_count < Decimal::ZERO {
        return Err(CaixaError::Validation(format!(
            "Machine count cannot be negative: {}",
            money(machine_count)
        )));
    }
    let explicit_opening = opening.as_deref().map(parse_amount).transpose()?;

    let opening_balance = match explicit_opening {
        Some(o) => o,
        None => load_snapshot(ctx, register, date)?.opening_balance,
    };

    let request = ClosingRequest {
        date,
        opening_balance,
        machine_count,
        notes: notes.trim().to_string(),
    };
    ctx.backend.save_closing(register, &request)?;
    println!(
        "{}",
        format!("Closing saved for Caixa {register} on {}.", date_br(date)).green()
    );

    let snapshot = load_snapshot(ctx, register, date)?;
    show(&snapshot);
    let result = reconciler::reconcile(&snapshot);
    tracing::info!(register, %date, variance = %result.variance, status = ?result.status, "closing saved");
    println!("Result: {}", status_label(result.status));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fake::FakeBackend;
    use crate::settings::Settings;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_missing_machine_count_blocks_save() {
        let backend = FakeBackend::default();
        let settings = Settings::default();
        let ctx = Context { backend: &backend, settings: &settings, today: today() };
        let err = save(&ctx, 1, None, None, None, "").unwrap_err();
        assert!(matches!(err, CaixaError::Validation(_)));
        let err = save(&ctx, 1, None, Some("  ".to_string()), None, "").unwrap_err();
        assert!(matches!(err, CaixaError::Validation(_)));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_negative_machine_count_blocks_save() {
        let backend = FakeBackend::default();
        let settings = Settings::default();
        let ctx = Context { backend: &backend, settings: &settings, today: today() };
        let err = save(&ctx, 1, None, Some("-5".to_string()), None, "").unwrap_err();
        assert!(matches!(err, CaixaError::Validation(_)));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_zero_machine_count_is_saved() {
        let backend = FakeBackend::default();
        let settings = Settings::default();
        let ctx = Context { backend: &backend, settings: &settings, today: today() };
        save(&ctx, 1, None, Some("0".to_string()), Some("0".to_string()), "").unwrap();
        assert_eq!(backend.calls()[0], "save_closing 1 0");
    }

    #[test]
    fn test_opening_defaults_to_server_value() {
        let backend = FakeBackend::with_opening("500");
        let settings = Settings::default();
        let ctx = Context { backend: &backend, settings: &settings, today: today() };
        save(&ctx, 4, None, Some("512,30".to_string()), None, "ok").unwrap();
        assert_eq!(
            backend.calls(),
            vec![
                "register_day 4 2025-01-15",
                "save_closing 4 512.30",
                "register_day 4 2025-01-15",
            ]
        );
        let saved = backend.closing.borrow().clone().unwrap();
        assert_eq!(saved.opening_balance, Decimal::new(500, 0));
        assert_eq!(saved.notes.as_deref(), Some("ok"));
    }

    #[test]
    fn test_explicit_opening_skips_prefetch() {
        let backend = FakeBackend::with_opening("500");
        let settings = Settings::default();
        let ctx = Context { backend: &backend, settings: &settings, today: today() };
        save(&ctx, 4, Some("2025-01-10".to_string()), Some("90".to_string()), Some("100".to_string()), "").unwrap();
        assert_eq!(
            backend.calls(),
            vec!["save_closing 4 90", "register_day 4 2025-01-10"]
        );
        let saved = backend.closing.borrow().clone().unwrap();
        assert_eq!(saved.opening_balance, Decimal::new(100, 0));
    }
}
