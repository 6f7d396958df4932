//! Application error types

use thiserror::Error;
use ticket_printer::PrintError;

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Priority must be 0–3, got {0}")]
    InvalidPriority(i64),

    #[error("Unknown sample: {index} (choose 1-{count})")]
    UnknownSample { index: usize, count: usize },

    #[error("Nothing to print: {0}")]
    EmptyJob(String),

    #[error(transparent)]
    Print(#[from] PrintError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid task file: {0}")]
    TaskFile(#[from] serde_json::Error),
}

pub type ReceiptResult<T> = Result<T, ReceiptError>;
