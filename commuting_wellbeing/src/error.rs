use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input data: {0}")]
    Validation(String),

    #[error("No eligible housing for income {income:.0} after {rounds} widening rounds")]
    NoEligibleHousing { income: f64, rounds: usize },
}

pub type SimResult<T> = Result<T, SimError>;
