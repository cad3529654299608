//! Client-side list filter

use chrono::NaiveDate;
use std::fmt;

use crate::render::{TaskNode, is_overdue_on};

/// Value of the filter selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl TaskFilter {
    /// Unknown selector values show everything
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => TaskFilter::Pending,
            "completed" => TaskFilter::Completed,
            "overdue" => TaskFilter::Overdue,
            _ => TaskFilter::All,
        }
    }

    pub fn matches(self, node: &TaskNode, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !node.completed,
            TaskFilter::Completed => node.completed,
            TaskFilter::Overdue => is_overdue_on(node.completed, node.due_date, today),
        }
    }

    /// Toggle visibility of every node in place; never reorders or removes
    pub fn apply(self, nodes: &mut [TaskNode], today: NaiveDate) {
        for node in nodes {
            node.hidden = !self.matches(node, today);
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskFilter::All => "all",
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
            TaskFilter::Overdue => "overdue",
        })
    }
}
