//! View state the controller mutates: list, stats slots, weather panel, form

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{CreateTaskRequest, Priority, Stats, TaskId, Weather};
use crate::render::{TaskNode, escape_html};

/// The task list container plus its empty-state placeholder
#[derive(Debug, Clone)]
pub struct TaskListView {
    nodes: Vec<TaskNode>,
    empty_state_visible: bool,
}

impl TaskListView {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            empty_state_visible: true,
        }
    }

    pub fn append(&mut self, node: TaskNode) {
        self.empty_state_visible = false;
        self.nodes.push(node);
    }

    /// Remove a node; reveals the placeholder when the list empties
    pub fn remove(&mut self, id: &TaskId) -> Option<TaskNode> {
        let pos = self.nodes.iter().position(|n| &n.task_id == id)?;
        let node = self.nodes.remove(pos);
        if self.nodes.is_empty() {
            self.empty_state_visible = true;
        }
        Some(node)
    }

    pub fn get(&self, id: &TaskId) -> Option<&TaskNode> {
        self.nodes.iter().find(|n| &n.task_id == id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut TaskNode> {
        self.nodes.iter_mut().find(|n| &n.task_id == id)
    }

    /// Swap in a freshly rendered node, keeping the slot and visibility
    pub fn replace(&mut self, node: TaskNode) {
        if let Some(slot) = self.get_mut(&node.task_id) {
            let hidden = slot.hidden;
            *slot = node;
            slot.hidden = hidden;
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.empty_state_visible = true;
    }

    pub fn nodes(&self) -> &[TaskNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [TaskNode] {
        &mut self.nodes
    }

    pub fn visible(&self) -> impl Iterator<Item = &TaskNode> {
        self.nodes.iter().filter(|n| !n.hidden)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn empty_state_visible(&self) -> bool {
        self.empty_state_visible
    }
}

impl Default for TaskListView {
    fn default() -> Self {
        Self::new()
    }
}

/// The four stats slots; counts are written verbatim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsPanel {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub overdue: u64,
}

impl StatsPanel {
    pub fn update(&mut self, stats: &Stats) {
        self.total = stats.total;
        self.completed = stats.completed;
        self.pending = stats.pending;
        self.overdue = stats.overdue;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherPanel {
    #[default]
    Empty,
    Loading,
    Ready(Weather),
    Error(String),
}

impl WeatherPanel {
    pub fn icon_url(&self) -> Option<String> {
        match self {
            WeatherPanel::Ready(w) => Some(weather_icon_url(&w.icon)),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            WeatherPanel::Empty => String::new(),
            WeatherPanel::Loading => r#"<div class="loading">Loading...</div>"#.to_string(),
            WeatherPanel::Ready(w) => {
                let description = escape_html(&w.description);
                format!(
                    r#"<div class="weather-city">{}</div><div class="weather-temp">{}°C</div><div class="weather-desc"><img src="{}" alt="{description}" class="weather-icon">{description}</div><div class="weather-details"><span>💧 {}%</span><span>💨 {} m/s</span></div>"#,
                    escape_html(&w.city),
                    w.temperature,
                    escape_html(&weather_icon_url(&w.icon)),
                    w.humidity,
                    w.wind_speed
                )
            }
            WeatherPanel::Error(message) => {
                format!(r#"<div class="weather-error">{}</div>"#, escape_html(message))
            }
        }
    }
}

pub fn weather_icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

/// Why the add-task form cannot be submitted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please enter a task name")]
    MissingName,
    #[error("Please enter a due date as YYYY-MM-DD")]
    InvalidDueDate,
}

/// The add-task form
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub name: String,
    /// `YYYY-MM-DD` or empty
    pub due_date: String,
    description: String,
    pub priority: Priority,
    min_due_date: NaiveDate,
    max_description_len: usize,
}

impl TaskForm {
    pub fn new(today: NaiveDate, max_description_len: usize) -> Self {
        Self {
            name: String::new(),
            due_date: String::new(),
            description: String::new(),
            priority: Priority::default(),
            min_due_date: today,
            max_description_len,
        }
    }

    /// Input handler for the description box; cuts at the length limit
    pub fn set_description(&mut self, text: &str) {
        self.description = text.chars().take(self.max_description_len).collect();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Live character counter
    pub fn char_count(&self) -> usize {
        self.description.chars().count()
    }

    /// Lowest selectable due date
    pub fn min_due_date(&self) -> NaiveDate {
        self.min_due_date
    }

    /// Trimmed request body. The due date must be empty or a calendar date.
    pub fn to_request(&self) -> Result<CreateTaskRequest, FormError> {
        let task = self.name.trim();
        if task.is_empty() {
            return Err(FormError::MissingName);
        }

        let due_date = match self.due_date.trim() {
            "" => String::new(),
            raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| FormError::InvalidDueDate)?
                .to_string(),
        };

        Ok(CreateTaskRequest {
            task: task.to_string(),
            due_date,
            description: self.description.trim().to_string(),
            priority: self.priority,
        })
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.due_date.clear();
        self.description.clear();
        self.priority = Priority::default();
    }
}

/// Clock line, e.g. `Sunday, October 18, 2026 at 09:05 PM`
pub fn format_clock(now: NaiveDateTime) -> String {
    now.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::render::render_task;

    fn node(id: u64) -> TaskNode {
        let task = Task {
            id: TaskId::from(id),
            name: format!("task {id}"),
            description: None,
            due_date: None,
            priority: Priority::High,
            completed: false,
            created_at: None,
        };
        render_task(&task, NaiveDateTime::default())
    }

    #[test]
    fn placeholder_follows_list_contents() {
        let mut list = TaskListView::new();
        assert!(list.empty_state_visible());

        list.append(node(1));
        list.append(node(2));
        assert!(!list.empty_state_visible());

        list.remove(&TaskId::from(1));
        assert!(!list.empty_state_visible());
        list.remove(&TaskId::from(2));
        assert!(list.empty_state_visible());
        assert!(list.remove(&TaskId::from(2)).is_none());
    }

    #[test]
    fn replace_keeps_position_and_visibility() {
        let mut list = TaskListView::new();
        list.append(node(1));
        list.append(node(2));
        list.nodes_mut()[0].hidden = true;

        let mut updated = node(1);
        updated.completed = true;
        list.replace(updated);

        assert_eq!(list.nodes()[0].task_id, TaskId::from(1));
        assert!(list.nodes()[0].completed);
        assert!(list.nodes()[0].hidden);
    }

    #[test]
    fn form_trims_and_rejects_blank_names() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut form = TaskForm::new(today, 10);
        form.name = "   ".to_string();
        assert_eq!(form.to_request().unwrap_err(), FormError::MissingName);

        form.name = "  Buy milk ".to_string();
        form.set_description("  two percent, please");
        let req = form.to_request().unwrap();
        assert_eq!(req.task, "Buy milk");
        assert_eq!(form.char_count(), 10);
        assert_eq!(req.description, "two perc");
        assert_eq!(form.min_due_date(), today);

        form.reset();
        assert_eq!(form.char_count(), 0);
        assert!(form.name.is_empty());
        assert_eq!(form.priority, Priority::Medium);
    }

    #[test]
    fn form_rejects_due_dates_that_are_not_dates() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut form = TaskForm::new(today, 500);
        form.name = "Dentist".to_string();

        for raw in ["tomorrow", "2026-13-01", "18/10/2026"] {
            form.due_date = raw.to_string();
            assert_eq!(form.to_request().unwrap_err(), FormError::InvalidDueDate);
        }

        form.due_date = " 2026-10-20 ".to_string();
        assert_eq!(form.to_request().unwrap().due_date, "2026-10-20");

        form.due_date = "  ".to_string();
        assert_eq!(form.to_request().unwrap().due_date, "");
    }

    #[test]
    fn weather_error_has_no_icon() {
        let panel = WeatherPanel::Error("City not found".to_string());
        assert_eq!(panel.icon_url(), None);
        assert_eq!(
            panel.to_html(),
            r#"<div class="weather-error">City not found</div>"#
        );
    }

    #[test]
    fn clock_format() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(21, 5, 0)
            .unwrap();
        assert_eq!(format_clock(now), "Sunday, October 18, 2026 at 09:05 PM");
    }
}
