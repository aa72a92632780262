use chrono::NaiveDate;
use dialoguer::Confirm;
use rust_decimal::Decimal;

use crate::cli::register::{load_snapshot, show};
use crate::cli::Context;
use crate::error::{CaixaError, Result};
use crate::fmt::{money, parse_amount};
use crate::models::{MovementKind, NewMovement};

/// Check user input before anything is sent.
pub fn validate(
    kind: MovementKind,
    description: &str,
    amount: &str,
    date: NaiveDate,
) -> Result<NewMovement> {
    let description = description.trim();
    if description.is_empty() {
        return Err(CaixaError::Validation("Description is required".to_string()));
    }
    if amount.trim().is_empty() {
        return Err(CaixaError::Validation("Amount is required".to_string()));
    }
    let amount = parse_amount(amount)?;
    if amount <= Decimal::ZERO {
        return Err(CaixaError::Validation(format!(
            "Amount must be greater than zero (got {})",
            money(amount)
        )));
    }
    Ok(NewMovement {
        kind,
        description: description.to_string(),
        amount,
        date,
    })
}

pub fn add(
    ctx: &Context,
    register: u32,
    kind: MovementKind,
    description: &str,
    amount: &str,
    date: Option<String>,
) -> Result<()> {
    ctx.settings.check_register(register)?;
    let date = ctx.date(&date)?;
    let movement = validate(kind, description, amount, date)?;

    let created = ctx.backend.add_movement(register, &movement)?;
    println!(
        "Added {} #{}: {} {}",
        kind.label().to_lowercase(),
        created.id,
        movement.description,
        money(movement.amount)
    );

    show(&load_snapshot(ctx, register, date)?);
    Ok(())
}

pub fn delete(ctx: &Context, register: u32, id: i64, date: Option<String>, yes: bool) -> Result<()> {
    ctx.settings.check_register(register)?;
    let date = ctx.date(&date)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove movement #{id} from Caixa {register}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    ctx.backend.delete_movement(register, id)?;
    println!("Removed movement #{id}.");

    show(&load_snapshot(ctx, register, date)?);
    Ok(())
}
