use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Largest magnitude the backend stores (`Numeric(10,2)`).
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

pub fn in_range(amount: &Decimal) -> bool {
    amount.abs() <= max_amount()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "suprimento")]
    Supply,
    #[serde(rename = "sangria")]
    Withdrawal,
}

impl MovementKind {
    pub fn label(self) -> &'static str {
        match self {
            MovementKind::Supply => "Supply",
            MovementKind::Withdrawal => "Withdrawal",
        }
    }
}

/// Reconciliation status. Wire names follow the backend (`VERIFICAR`, `PENDENTE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "VERIFICAR")]
    NeedsReview,
    #[serde(rename = "PENDENTE")]
    Pending,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NeedsReview => "NEEDS REVIEW",
            Status::Pending => "PENDING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movement {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: MovementKind,
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// `None` when the payload carried a missing or non-numeric value.
    #[serde(rename = "valor", default, deserialize_with = "lenient_amount")]
    pub amount: Option<Decimal>,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "caixa", default)]
    pub register: u32,
    #[serde(rename = "ordem", default)]
    pub order: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Request body for creating a movement.
#[derive(Debug, Clone, Serialize)]
pub struct NewMovement {
    #[serde(rename = "tipo")]
    pub kind: MovementKind,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "data")]
    pub date: NaiveDate,
}

/// Request body for saving a closing report.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingRequest {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "saldo_inicial", with = "rust_decimal::serde::float")]
    pub opening_balance: Decimal,
    #[serde(rename = "valor_maquina", with = "rust_decimal::serde::float")]
    pub machine_count: Decimal,
    #[serde(rename = "observacoes")]
    pub notes: String,
}

/// Persisted closing report (`fechamento`) as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosingReport {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "caixa")]
    pub register: u32,
    #[serde(rename = "saldo_inicial", default)]
    pub opening_balance: Decimal,
    #[serde(rename = "valor_maquina", default, deserialize_with = "bounded_amount")]
    pub machine_count: Decimal,
    #[serde(rename = "total_suprimentos", default)]
    pub total_supplies: Decimal,
    #[serde(rename = "total_sangrias", default)]
    pub total_withdrawals: Decimal,
    #[serde(rename = "saldo_calculado", default)]
    pub computed_balance: Decimal,
    #[serde(rename = "diferenca", default)]
    pub variance: Decimal,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One register row of the dashboard and central views.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterSummary {
    #[serde(rename = "caixa")]
    pub register: u32,
    #[serde(rename = "saldo_inicial", default)]
    pub opening_balance: Decimal,
    #[serde(rename = "valor_maquina", default)]
    pub machine_count: Decimal,
    #[serde(rename = "total_suprimentos", default)]
    pub total_supplies: Decimal,
    #[serde(rename = "total_sangrias", default)]
    pub total_withdrawals: Decimal,
    #[serde(rename = "saldo_calculado", default)]
    pub computed_balance: Decimal,
    #[serde(rename = "diferenca", default)]
    pub variance: Decimal,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardTotals {
    #[serde(rename = "suprimentos")]
    pub supplies: Decimal,
    #[serde(rename = "sangrias")]
    pub withdrawals: Decimal,
    #[serde(rename = "saldo_total")]
    pub total_balance: Decimal,
    #[serde(rename = "caixas_com_problema")]
    pub problem_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "caixas")]
    pub registers: Vec<RegisterSummary>,
    #[serde(rename = "totais")]
    pub totals: DashboardTotals,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Consolidation {
    #[serde(rename = "total_suprimentos")]
    pub total_supplies: Decimal,
    #[serde(rename = "total_sangrias")]
    pub total_withdrawals: Decimal,
    #[serde(rename = "saldo_total")]
    pub total_balance: Decimal,
    #[serde(rename = "caixas_com_problema")]
    pub problem_count: u32,
    #[serde(rename = "maior_diferenca", default)]
    pub largest_variance: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Central {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "caixas")]
    pub registers: Vec<RegisterSummary>,
    #[serde(rename = "consolidacao")]
    pub consolidation: Consolidation,
}

/// Raw register-day payload from `GET /caixa/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDay {
    #[serde(rename = "caixa")]
    pub register: u32,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "saldo_inicial", default, deserialize_with = "bounded_amount")]
    pub opening_balance: Decimal,
    #[serde(rename = "fechamento", default)]
    pub closing: Option<ClosingReport>,
    #[serde(rename = "suprimentos", default)]
    pub supplies: Vec<Movement>,
    #[serde(rename = "sangrias", default)]
    pub withdrawals: Vec<Movement>,
}

/// Input to the reconciliation engine for one register on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterDaySnapshot {
    pub register_id: u32,
    pub date: NaiveDate,
    pub opening_balance: Decimal,
    pub movements: Vec<Movement>,
    pub machine_count: Option<Decimal>,
    pub notes: Option<String>,
}

impl RegisterDaySnapshot {
    /// Build a snapshot from the server payload. Supplies come first, then
    /// withdrawals, each in the server's order. The saved closing (if any)
    /// provides the machine count and notes.
    pub fn from_register_day(day: RegisterDay) -> Self {
        let (machine_count, notes) = match day.closing {
            Some(c) => (Some(c.machine_count), c.notes.filter(|n| !n.is_empty())),
            None => (None, None),
        };
        let mut movements = day.supplies;
        movements.extend(day.withdrawals);
        Self {
            register_id: day.register,
            date: day.date,
            opening_balance: day.opening_balance,
            movements,
            machine_count,
            notes,
        }
    }

    pub fn movements_of(&self, kind: MovementKind) -> impl Iterator<Item = &Movement> {
        self.movements.iter().filter(move |m| m.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub total_supplies: Decimal,
    pub total_withdrawals: Decimal,
    pub computed_balance: Decimal,
    pub variance: Decimal,
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub register: Option<u32>,
}

/// Accepts a JSON number, a numeric string, or null. Anything else, including
/// amounts the backend could never have stored, maps to `None`.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let text = match raw {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        _ => return Ok(None),
    };
    Ok(text
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&text).ok())
        .filter(in_range))
}

/// Balances and counts feed the reconciliation directly, so an out-of-range
/// value rejects the whole payload.
fn bounded_amount<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = <Decimal as Deserialize>::deserialize(deserializer)?;
    if in_range(&value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!("amount out of range: {value}")))
    }
}
