//! Task receipt model
//!
//! A receipt carries one task: an upper-cased title, a description cut to
//! [`CHAR_LIMIT`] characters, a priority and the time it was created.

mod layout;

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::ReceiptError;

pub use layout::{CHAR_LIMIT, CHAR_WIDTH, MAX_LINES, ReceiptLayout, center, wrap};

/// Timestamp format printed in the footer
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d  %H:%M";

/// Task priority, 0 (lowest) to 3
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum Priority {
    #[default]
    FutureBreakdown = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::FutureBreakdown,
        Priority::Low,
        Priority::Medium,
        Priority::High,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::FutureBreakdown => "FUTURE / BREAKDOWN",
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for Priority {
    type Error = ReceiptError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::FutureBreakdown),
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(ReceiptError::InvalidPriority(other)),
        }
    }
}

impl From<Priority> for i64 {
    fn from(p: Priority) -> Self {
        i64::from(p.level())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single-task receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    title: String,
    description: String,
    priority: Priority,
    timestamp: String,
}

impl Receipt {
    /// Create a receipt stamped with the current local time
    pub fn new(title: &str, description: &str, priority: Priority) -> Self {
        Self {
            title: title.to_uppercase(),
            description: description.chars().take(CHAR_LIMIT).collect(),
            priority,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Replace the footer timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Receipt lines for 80mm paper
    pub fn lines(&self) -> Vec<String> {
        self.lines_with(&ReceiptLayout::default())
    }

    pub fn lines_with(&self, layout: &ReceiptLayout) -> Vec<String> {
        layout.render(self)
    }

    /// Plain-text preview, no printer needed
    pub fn preview(&self) -> String {
        self.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_int() {
        assert_eq!(Priority::try_from(0).unwrap(), Priority::FutureBreakdown);
        assert_eq!(Priority::try_from(3).unwrap(), Priority::High);

        let err = Priority::try_from(4).unwrap_err();
        assert_eq!(err.to_string(), "Priority must be 0–3, got 4");
        assert!(Priority::try_from(-1).is_err());
    }

    #[test]
    fn test_priority_labels() {
        let labels: Vec<_> = Priority::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, ["FUTURE / BREAKDOWN", "LOW", "MEDIUM", "HIGH"]);
        assert_eq!(Priority::Medium.to_string(), "MEDIUM");
    }

    #[test]
    fn test_priority_serde() {
        let p: Priority = serde_json::from_str("2").unwrap();
        assert_eq!(p, Priority::Medium);
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "3");
        assert!(serde_json::from_str::<Priority>("7").is_err());
    }

    #[test]
    fn test_receipt_normalises_input() {
        let long = "y".repeat(CHAR_LIMIT + 50);
        let r = Receipt::new("fix login bug", &long, Priority::High);

        assert_eq!(r.title(), "FIX LOGIN BUG");
        assert_eq!(r.description().chars().count(), CHAR_LIMIT);
        assert_eq!(r.priority(), Priority::High);
    }

    #[test]
    fn test_timestamp_format() {
        let r = Receipt::new("t", "d", Priority::Low);
        // "2024-05-01  09:30"
        assert_eq!(r.timestamp().len(), 17);
        assert!(
            chrono::NaiveDateTime::parse_from_str(r.timestamp(), TIMESTAMP_FORMAT).is_ok()
        );
    }

    #[test]
    fn test_preview_joins_lines() {
        let r = Receipt::new("t", "d", Priority::Low).with_timestamp("now");
        let preview = r.preview();
        assert_eq!(preview.lines().count(), r.lines().len());
        assert!(preview.starts_with(&"=".repeat(CHAR_WIDTH)));
    }
}
