//! Display colors for task status and priority.
//!
//! Typed values map exhaustively; the string variants exist for untrusted
//! input and fall back to `FALLBACK_COLOR`.

use crate::repository::{TaskPriority, TaskStatus};

pub const FALLBACK_COLOR: &str = "grey";

impl TaskStatus {
    pub fn color(self) -> &'static str {
        match self {
            TaskStatus::Pending => "orange",
            TaskStatus::InProgress => "blue",
            TaskStatus::Completed => "green",
        }
    }
}

impl TaskPriority {
    pub fn color(self) -> &'static str {
        match self {
            TaskPriority::Low => "success",
            TaskPriority::Medium => "warning",
            TaskPriority::High => "error",
        }
    }
}

/// Color for a status label, or `FALLBACK_COLOR` when unknown.
///
pub fn status_color(status: &str) -> &'static str {
    status
        .parse::<TaskStatus>()
        .map(TaskStatus::color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Color for a priority label, or `FALLBACK_COLOR` when unknown.
///
pub fn priority_color(priority: &str) -> &'static str {
    priority
        .parse::<TaskPriority>()
        .map(TaskPriority::color)
        .unwrap_or(FALLBACK_COLOR)
}
