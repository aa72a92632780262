use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CaixaError, Result};
use crate::models::{
    Central, ClosingReport, ClosingRequest, Dashboard, HistoryFilter, Movement, NewMovement,
    RegisterDay,
};
use crate::settings::Settings;

/// Request/response operations offered by the reconciliation backend.
pub trait Backend {
    fn dashboard(&self) -> Result<Dashboard>;
    fn register_day(&self, register: u32, date: NaiveDate) -> Result<RegisterDay>;
    fn add_movement(&self, register: u32, movement: &NewMovement) -> Result<Movement>;
    fn delete_movement(&self, register: u32, movement_id: i64) -> Result<()>;
    fn save_closing(&self, register: u32, closing: &ClosingRequest) -> Result<ClosingReport>;
    fn central(&self, date: NaiveDate) -> Result<Central>;
    fn history(&self, filter: &HistoryFilter) -> Result<Vec<ClosingReport>>;
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Unwrap a `{ success, data, error }` response body.
///
/// `success: false` becomes `CaixaError::Api` with the server's message.
/// Returns `None` when a successful response carries no `data`.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Option<T>> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if !envelope.success {
        let message = envelope
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "Request failed".to_string());
        return Err(CaixaError::Api(message));
    }
    match envelope.data {
        None | Some(Value::Null) => Ok(None),
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
    }
}

fn require<T>(data: Option<T>, what: &str) -> Result<T> {
    data.ok_or_else(|| CaixaError::Api(format!("Server returned no {what}")))
}

fn status_error(status: StatusCode) -> String {
    match status.as_u16() {
        404 => "Endpoint not found (check the API URL with `caixa status`)".to_string(),
        s if s >= 500 => format!("Server error (HTTP {s})"),
        s => format!("Unexpected response from server (HTTP {s})"),
    }
}

pub fn history_query(filter: &HistoryFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(from) = filter.from {
        query.push(("data_inicio", from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = filter.to {
        query.push(("data_fim", to.format("%Y-%m-%d").to_string()));
    }
    if let Some(register) = filter.register {
        query.push(("caixa", register.to_string()));
    }
    query
}

pub struct HttpBackend {
    client: Client,
    base: String,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Option<T>> {
        let resp = req.send()?;
        let status = resp.status();
        let body = resp.text()?;
        tracing::debug!(%status, bytes = body.len(), "response received");
        match decode_envelope(&body) {
            Err(CaixaError::Parse(e)) if !status.is_success() => {
                tracing::debug!(error = %e, "non-JSON error body");
                Err(CaixaError::Api(status_error(status)))
            }
            other => other,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Option<T>> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        self.send(self.client.get(&url).query(query))
    }
}

impl Backend for HttpBackend {
    fn dashboard(&self) -> Result<Dashboard> {
        require(self.get("/dashboard", &[])?, "dashboard")
    }

    fn register_day(&self, register: u32, date: NaiveDate) -> Result<RegisterDay> {
        let data = self.get(
            &format!("/caixa/{register}"),
            &[("data", date.format("%Y-%m-%d").to_string())],
        )?;
        require(data, "register data")
    }

    fn add_movement(&self, register: u32, movement: &NewMovement) -> Result<Movement> {
        let url = self.url(&format!("/caixa/{register}/movimentacao"));
        tracing::info!(register, kind = ?movement.kind, amount = %movement.amount, "adding movement");
        require(self.send(self.client.post(&url).json(movement))?, "movement")
    }

    fn delete_movement(&self, register: u32, movement_id: i64) -> Result<()> {
        let url = self.url(&format!("/caixa/{register}/movimentacao/{movement_id}"));
        tracing::info!(register, movement_id, "deleting movement");
        self.send::<Value>(self.client.delete(&url))?;
        Ok(())
    }

    fn save_closing(&self, register: u32, closing: &ClosingRequest) -> Result<ClosingReport> {
        let url = self.url(&format!("/caixa/{register}/fechamento"));
        tracing::info!(register, date = %closing.date, "saving closing report");
        require(self.send(self.client.post(&url).json(closing))?, "closing report")
    }

    fn central(&self, date: NaiveDate) -> Result<Central> {
        let data = self.get("/central", &[("data", date.format("%Y-%m-%d").to_string())])?;
        require(data, "central data")
    }

    fn history(&self, filter: &HistoryFilter) -> Result<Vec<ClosingReport>> {
        Ok(self.get("/historico", &history_query(filter))?.unwrap_or_default())
    }
}
