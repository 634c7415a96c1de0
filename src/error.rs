use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{table} table, record {record}: {reason}")]
    InputSchema {
        table: &'static str,
        record: usize,
        reason: String,
    },

    #[error("{0} table has no rows")]
    EmptyDataset(&'static str),

    #[error("organization {0} has no centrality attributes")]
    MissingAttributes(String),

    #[error("organization {0} has no layout position")]
    MissingPosition(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("drawing failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetworkError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
