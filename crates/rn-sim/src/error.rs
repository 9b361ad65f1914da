use rn_path::PathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("pathfinder error: {0}")]
    Path(#[from] PathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
