//! TaskListController: message handlers over the page view state
//!
//! UI input, timer ticks and the start-up sequence all arrive as [`Message`]s.
//! `handle` takes `&mut self`, so one message (including the requests it
//! awaits) finishes before the next is looked at. Two actions on the same
//! task can therefore never overlap.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Instant;

use crate::api::{ApiError, Backend};
use crate::config::Config;
use crate::filter::TaskFilter;
use crate::models::{Priority, Task, TaskId, UpdateTaskRequest};
use crate::notify::{NotificationCenter, Severity};
use crate::render::render_task;
use crate::view::{StatsPanel, TaskForm, TaskListView, WeatherPanel, format_clock};

pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this task?";
const NETWORK_ERROR: &str = "Network error. Please try again.";
const WEATHER_UNAVAILABLE: &str = "Weather unavailable";
const SAVED_NOT_SHOWN: &str = "Task was saved but could not be displayed";
const UNREADABLE_RESPONSE: &str = "Unexpected response from the server";

/// Source of the current local time
pub type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// What was clicked inside the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    DeleteButton,
    /// Completion checkbox, with the state it shows after the click
    Checkbox { checked: bool },
    Other,
}

/// A click delegated to the list container.
///
/// `task_id` is the id of the closest enclosing task item, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEvent {
    pub task_id: Option<TaskId>,
    pub target: ListTarget,
}

impl ListEvent {
    pub fn delete(id: impl Into<TaskId>) -> Self {
        Self {
            task_id: Some(id.into()),
            target: ListTarget::DeleteButton,
        }
    }

    pub fn checkbox(id: impl Into<TaskId>, checked: bool) -> Self {
        Self {
            task_id: Some(id.into()),
            target: ListTarget::Checkbox { checked },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Page load: clock, stats and weather
    Start,
    SetTaskName(String),
    SetDueDate(String),
    SetPriority(Priority),
    DescriptionInput(String),
    SubmitTask,
    List(ListEvent),
    /// Answer to the delete confirmation
    ConfirmDelete(bool),
    FilterChanged(String),
    /// Weather search; `None` reuses the current city input
    LoadWeather(Option<String>),
    DismissNotification(u64),
    ExpireNotifications,
    ClockTick,
}

pub struct TaskListController<B> {
    backend: B,
    config: Config,
    clock: Clock,
    /// Last-known-good copy of every rendered task
    tasks: HashMap<TaskId, Task>,
    list: TaskListView,
    stats: StatsPanel,
    weather: WeatherPanel,
    form: TaskForm,
    toasts: NotificationCenter,
    filter: TaskFilter,
    city_input: String,
    clock_text: String,
    pending_delete: Option<TaskId>,
}

impl<B: Backend> TaskListController<B> {
    pub fn new(backend: B, config: Config) -> Self {
        Self::with_clock(backend, config, Box::new(|| Local::now().naive_local()))
    }

    pub fn with_clock(backend: B, config: Config, clock: Clock) -> Self {
        let now = clock();
        let form = TaskForm::new(now.date(), config.ui.description_max_len);
        let toasts = NotificationCenter::new(config.ui.toast_delay());

        Self {
            backend,
            config,
            clock,
            tasks: HashMap::new(),
            list: TaskListView::new(),
            stats: StatsPanel::default(),
            weather: WeatherPanel::default(),
            form,
            toasts,
            filter: TaskFilter::default(),
            city_input: String::new(),
            clock_text: format_clock(now),
            pending_delete: None,
        }
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Process one message to completion
    pub async fn handle(&mut self, message: Message) {
        tracing::trace!(?message, "Handling message");

        match message {
            Message::Start => self.start().await,
            Message::SetTaskName(name) => self.form.name = name,
            Message::SetDueDate(date) => self.form.due_date = date,
            Message::SetPriority(priority) => self.form.priority = priority,
            Message::DescriptionInput(text) => self.form.set_description(&text),
            Message::SubmitTask => self.submit_task().await,
            Message::List(event) => self.dispatch_list_event(event).await,
            Message::ConfirmDelete(confirmed) => self.confirm_delete(confirmed).await,
            Message::FilterChanged(value) => self.apply_filter(&value),
            Message::LoadWeather(city) => {
                if let Some(city) = city {
                    self.city_input = city;
                }
                self.load_weather().await;
            }
            Message::DismissNotification(id) => {
                self.toasts.dismiss(id);
            }
            Message::ExpireNotifications => {
                self.toasts.expire(Instant::now());
            }
            Message::ClockTick => self.clock_text = format_clock(self.now()),
        }
    }

    async fn start(&mut self) {
        tracing::info!(backend = std::any::type_name::<B>(), "Starting task list controller");
        self.clock_text = format_clock(self.now());
        self.refresh_stats().await;
        self.load_weather().await;
    }

    /// Adopt server-rendered tasks, in the order the page lists them
    pub fn hydrate(&mut self, mut tasks: Vec<Task>) {
        sort_for_display(&mut tasks);

        let now = self.now();
        self.tasks.clear();
        self.list.clear();
        for task in tasks {
            self.list.append(render_task(&task, now));
            self.tasks.insert(task.id.clone(), task);
        }

        let today = now.date();
        self.filter.apply(self.list.nodes_mut(), today);
        tracing::debug!(count = self.list.len(), "Hydrated task list");
    }

    #[tracing::instrument(skip(self))]
    async fn submit_task(&mut self) {
        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(invalid) => {
                self.notify(invalid.to_string(), Severity::Warning);
                return;
            }
        };

        match self.backend.create_task(&request).await {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "Task created");
                self.add_task_to_view(task);
                self.form.reset();
                self.refresh_stats().await;
                self.notify("Task added successfully!", Severity::Success);
            }
            Err(err @ ApiError::Decode(_)) => {
                // Stored by the backend, so a resubmit would duplicate it
                tracing::warn!(error = %err, "Task created but response unreadable");
                self.form.reset();
                self.refresh_stats().await;
                self.notify(SAVED_NOT_SHOWN, Severity::Warning);
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to add task");
                let message = failure_message(&err, "Error adding task");
                self.notify(message, Severity::Error);
            }
        }
    }

    fn add_task_to_view(&mut self, task: Task) {
        let node = render_task(&task, self.now());
        if self.list.get(&task.id).is_some() {
            self.list.replace(node);
        } else {
            self.list.append(node);
        }
        self.tasks.insert(task.id.clone(), task);
    }

    async fn dispatch_list_event(&mut self, event: ListEvent) {
        let Some(id) = event.task_id else {
            return;
        };

        match event.target {
            ListTarget::DeleteButton => {
                if self.known(&id) {
                    self.pending_delete = Some(id);
                }
            }
            ListTarget::Checkbox { checked } => {
                if self.known(&id) {
                    self.toggle_completion(id, checked).await;
                }
            }
            ListTarget::Other => {}
        }
    }

    fn known(&mut self, id: &TaskId) -> bool {
        if self.tasks.contains_key(id) {
            return true;
        }
        tracing::warn!(task_id = %id, "Action on a task that is not in the list");
        self.notify("That task is no longer in the list", Severity::Warning);
        false
    }

    async fn confirm_delete(&mut self, confirmed: bool) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if confirmed {
            self.delete_task(id).await;
        } else {
            tracing::debug!(task_id = %id, "Delete cancelled");
        }
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_completion(&mut self, id: TaskId, completed: bool) {
        let Some(cached) = self.tasks.get(&id).cloned() else {
            return;
        };
        if let Some(node) = self.list.get_mut(&id) {
            node.checked = completed;
        }

        let request = UpdateTaskRequest { completed };
        match self.backend.update_task(&id, &request).await {
            Ok(echoed) => {
                let task = match echoed {
                    Some(task) if task.id == id => task,
                    _ => Task {
                        completed,
                        ..cached
                    },
                };
                tracing::info!(task_id = %id, completed = task.completed, "Task updated");

                let node = render_task(&task, self.now());
                self.list.replace(node);
                self.tasks.insert(id, task);
                self.refresh_stats().await;

                let state = if completed { "completed" } else { "pending" };
                self.notify(format!("Task marked as {state}"), Severity::Success);
            }
            Err(err) => {
                tracing::warn!(task_id = %id, error = %err, "Failed to update task");
                if let Some(node) = self.list.get_mut(&id) {
                    node.checked = cached.completed;
                }
                let message = failure_message(&err, "Error updating task");
                self.notify(message, Severity::Error);
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&mut self, id: TaskId) {
        match self.backend.delete_task(&id).await {
            Ok(()) => {
                tracing::info!(task_id = %id, "Task deleted");
                self.list.remove(&id);
                self.tasks.remove(&id);
                self.refresh_stats().await;
                self.notify("Task deleted successfully", Severity::Success);
            }
            Err(err) => {
                tracing::warn!(task_id = %id, error = %err, "Failed to delete task");
                let message = failure_message(&err, "Error deleting task");
                self.notify(message, Severity::Error);
            }
        }
    }

    async fn refresh_stats(&mut self) {
        match self.backend.stats().await {
            Ok(stats) => self.stats.update(&stats),
            Err(err) => tracing::warn!(error = %err, "Failed to load stats"),
        }
    }

    fn apply_filter(&mut self, value: &str) {
        self.filter = TaskFilter::parse(value);
        let today = self.today();
        self.filter.apply(self.list.nodes_mut(), today);
        tracing::debug!(filter = %self.filter, visible = self.list.visible().count(), "Filter applied");
    }

    async fn load_weather(&mut self) {
        let city = match self.city_input.trim() {
            "" => self.config.weather.default_city.clone(),
            city => city.to_string(),
        };

        self.weather = WeatherPanel::Loading;
        self.weather = match self.backend.weather(&city).await {
            Ok(weather) => WeatherPanel::Ready(weather),
            Err(err) => {
                tracing::warn!(%city, error = %err, "Weather lookup failed");
                let message = err.backend_message().unwrap_or(WEATHER_UNAVAILABLE);
                WeatherPanel::Error(message.to_string())
            }
        };
    }

    fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.toasts.show(message, severity, Instant::now());
    }

    pub fn list(&self) -> &TaskListView {
        &self.list
    }

    pub fn stats(&self) -> &StatsPanel {
        &self.stats
    }

    pub fn weather(&self) -> &WeatherPanel {
        &self.weather
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn toasts(&self) -> &NotificationCenter {
        &self.toasts
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Question to put to the user while a delete waits for confirmation
    pub fn pending_confirmation(&self) -> Option<&'static str> {
        self.pending_delete.as_ref().map(|_| CONFIRM_DELETE)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Backend message when there is one, otherwise the fallback. Transport
/// failures get the generic network message.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    if let Some(message) = err.backend_message() {
        return message.to_string();
    }
    match err {
        ApiError::Rejected { .. } => fallback.to_string(),
        ApiError::Network(_) => NETWORK_ERROR.to_string(),
        ApiError::Decode(_) => UNREADABLE_RESPONSE.to_string(),
    }
}

/// Open tasks first, then by priority, then by due date (undated last),
/// newest first within ties.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.due_date.is_none().cmp(&b.due_date.is_none()))
            .then_with(|| a.due_date.cmp(&b.due_date))
            .then_with(|| Reverse(&a.created_at).cmp(&Reverse(&b.created_at)))
    });
}
