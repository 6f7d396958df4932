//! Tasks to print: built-in samples and JSON task files

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ReceiptError, ReceiptResult};
use crate::html::DESCRIPTION_CHAR_LIMIT;
use crate::receipt::{Priority, Receipt};
use crate::ruler;

/// A task as entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
        }
    }

    /// Receipt stamped with the current time
    pub fn receipt(&self) -> Receipt {
        Receipt::new(&self.title, &self.description, self.priority)
    }
}

/// Sample receipts for layout checks
pub fn samples() -> Vec<Task> {
    vec![
        Task::new(
            "Buy Groceries",
            "Pick up milk, eggs, bread, and coffee from the store before 6pm.",
            Priority::Low,
        ),
        Task::new(
            "Fix Login Bug",
            "Users on the auth refresh endpoint are getting 401 errors after \
             token expiry. Check the validation logic.",
            Priority::High,
        ),
        Task::new(
            "Plan Q3 Roadmap",
            "Draft feature roadmap for Q3. Include push notifications, \
             dark mode, and new onboarding flow.",
            Priority::Medium,
        ),
    ]
}

/// Look up a sample by its 1-based number
pub fn sample(number: usize) -> ReceiptResult<Task> {
    let all = samples();
    let count = all.len();
    number
        .checked_sub(1)
        .and_then(|i| all.into_iter().nth(i))
        .ok_or(ReceiptError::UnknownSample {
            index: number,
            count,
        })
}

/// Ruler receipt filling `limit` characters
pub fn ruler_task(limit: usize) -> Task {
    Task::new(
        format!("Char Test {}", limit),
        ruler::build(limit, ruler::DEFAULT_INTERVAL),
        Priority::FutureBreakdown,
    )
}

/// Everything printed by a full test run: the samples, then a ruler at the
/// HTML description limit
pub fn test_suite() -> Vec<Task> {
    let mut tasks = samples();
    tasks.push(ruler_task(DESCRIPTION_CHAR_LIMIT));
    tasks
}

/// Load tasks from a JSON file: an array of `{title, description, priority}`
pub fn load_tasks(path: &Path) -> ReceiptResult<Vec<Task>> {
    let content = std::fs::read_to_string(path)?;
    let tasks: Vec<Task> = serde_json::from_str(&content)?;
    info!(path = %path.display(), count = tasks.len(), "tasks loaded");
    Ok(tasks)
}
