//! Task rendering: escaping, derived flags and item markup

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

use crate::models::{Priority, Task, TaskId};

/// Escape user-supplied text before it goes into markup
pub fn escape_html(unsafe_text: &str) -> String {
    let mut out = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// A due date counts from its midnight, so anything due today is already
/// past once the day has started.
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    match task.due_date {
        Some(due) if !task.completed => due.and_time(NaiveTime::MIN) < now,
        _ => false,
    }
}

/// Day-granularity variant used by the list filter
pub fn is_overdue_on(completed: bool, due_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    !completed && due_date.is_some_and(|due| due < today)
}

/// One rendered list item.
///
/// Carries the attributes later operations query (`data-task-id`,
/// `data-completed`, `data-priority`, `data-due-date`) plus the display
/// state of its checkbox and visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub task_id: TaskId,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
    /// What the checkbox currently shows; may run ahead of `completed`
    /// while an update is in flight
    pub checked: bool,
    pub hidden: bool,
    name_html: String,
    description_html: Option<String>,
    created_label: String,
}

/// Render a task into a list node
pub fn render_task(task: &Task, now: NaiveDateTime) -> TaskNode {
    let created_label = task
        .created_at
        .as_deref()
        .map(|c| c.chars().take(10).collect::<String>())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "Today".to_string());

    TaskNode {
        task_id: task.id.clone(),
        completed: task.completed,
        priority: task.priority,
        due_date: task.due_date,
        overdue: is_overdue(task, now),
        checked: task.completed,
        hidden: false,
        name_html: escape_html(&task.name),
        description_html: task
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(escape_html),
        created_label,
    }
}

impl TaskNode {
    /// Escaped task name
    pub fn name_html(&self) -> &str {
        &self.name_html
    }

    pub fn description_html(&self) -> Option<&str> {
        self.description_html.as_deref()
    }

    pub fn created_label(&self) -> &str {
        &self.created_label
    }

    /// Value of the `data-completed` attribute
    pub fn data_completed(&self) -> &'static str {
        if self.completed { "true" } else { "false" }
    }

    /// Item markup, matching the list template of the web page
    pub fn to_html(&self) -> String {
        let id = escape_html(self.task_id.as_str());
        let level = self.priority.level();
        let mut html = String::new();

        let _ = write!(
            html,
            r#"<div class="task-item" data-task-id="{id}" data-completed="{}" data-priority="{level}""#,
            self.data_completed()
        );
        if let Some(due) = self.due_date {
            let _ = write!(html, r#" data-due-date="{due}""#);
        }
        if self.hidden {
            html.push_str(r#" style="display: none""#);
        }
        html.push('>');

        let _ = write!(
            html,
            r#"<div class="task-card{} priority-{level}">"#,
            if self.completed { " completed" } else { "" }
        );
        let _ = write!(
            html,
            r#"<div class="task-header"><div class="task-title-section"><input type="checkbox" class="task-checkbox"{} data-task-id="{id}"><span class="task-title">{}</span></div>"#,
            if self.checked { " checked" } else { "" },
            self.name_html
        );
        let _ = write!(
            html,
            r#"<div class="task-actions"><span class="priority-badge priority-{level}">{}</span><button class="btn btn-sm btn-outline-danger delete-btn" data-task-id="{id}"><i class="bi bi-trash"></i></button></div></div>"#,
            self.priority.badge()
        );

        if let Some(due) = self.due_date {
            let _ = write!(
                html,
                r#"<div class="task-due-date"><i class="bi bi-calendar me-1"></i><span class="due-text">{due}</span>{}</div>"#,
                if self.overdue {
                    r#"<span class="badge bg-danger ms-2">Overdue</span>"#
                } else {
                    ""
                }
            );
        }

        if let Some(description) = &self.description_html {
            let _ = write!(html, r#"<div class="task-description">{description}</div>"#);
        }

        let _ = write!(
            html,
            r#"<div class="task-footer"><small class="text-muted">Created: {}</small></div></div></div>"#,
            escape_html(&self.created_label)
        );

        html
    }
}
