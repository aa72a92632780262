use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaixaError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from server: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date: {0} (expected YYYY-MM-DD, 'today' or a day offset like -1)")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown register: {0} (registers are numbered 1 to {1})")]
    UnknownRegister(u32, u32),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, CaixaError>;
