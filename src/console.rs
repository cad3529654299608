//! Console front end: command parsing and a text rendering of the page

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fmt::Write;
use std::path::Path;

use crate::api::Backend;
use crate::controller::{ListEvent, Message, TaskListController};
use crate::models::{Priority, Task, TaskId};
use crate::view::WeatherPanel;

/// One line typed at the prompt
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConsoleCommand {
    /// Fill in the form and submit a new task
    Add {
        /// Task name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long, value_parser = clap::value_parser!(NaiveDate))]
        due: Option<NaiveDate>,

        /// Priority: 1 = low, 2 = medium, 3 = high
        #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: u8,

        /// Description
        #[arg(long)]
        desc: Option<String>,
    },

    /// Submit the form again as it stands
    Retry,

    /// Type into the description box
    Desc { text: Vec<String> },

    /// Click a task's completion checkbox
    Toggle { id: String },

    /// Click a task's delete button
    Delete { id: String },

    /// Change the filter (all, pending, completed, overdue)
    Filter { value: String },

    /// Look up the weather (blank = configured default city)
    Weather { city: Vec<String> },

    /// Close a notification
    Dismiss { id: u64 },

    /// Print the page
    Show,

    /// Leave
    #[command(alias = "exit")]
    Quit,
}

/// Split a line into words, honouring single and double quotes
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse a prompt line; `Ok(None)` for a blank line
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let words = split_words(line)?;
    if words.is_empty() {
        return Ok(None);
    }
    ConsoleLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.render().to_string())
}

/// Read a JSON array of tasks to show at start-up
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tasks file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse tasks file: {}", path.display()))
}

/// Answer typed while a delete confirmation is open; anything but yes cancels
pub fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Translate a command into the UI messages it stands for
pub fn to_messages<B: Backend>(
    command: ConsoleCommand,
    controller: &TaskListController<B>,
) -> Vec<Message> {
    match command {
        ConsoleCommand::Add {
            name,
            due,
            priority,
            desc,
        } => {
            let priority = Priority::try_from(priority).unwrap_or_default();
            vec![
                Message::SetTaskName(name.join(" ")),
                Message::SetDueDate(due.map(|d| d.to_string()).unwrap_or_default()),
                Message::DescriptionInput(desc.unwrap_or_default()),
                Message::SetPriority(priority),
                Message::SubmitTask,
            ]
        }
        ConsoleCommand::Retry => vec![Message::SubmitTask],
        ConsoleCommand::Desc { text } => vec![Message::DescriptionInput(text.join(" "))],
        ConsoleCommand::Toggle { id } => {
            let id = TaskId::new(id);
            // The click flips whatever the checkbox shows right now
            let checked = controller.list().get(&id).is_none_or(|node| !node.checked);
            vec![Message::List(ListEvent::checkbox(id, checked))]
        }
        ConsoleCommand::Delete { id } => {
            vec![Message::List(ListEvent::delete(TaskId::new(id)))]
        }
        ConsoleCommand::Filter { value } => vec![Message::FilterChanged(value)],
        ConsoleCommand::Weather { city } => vec![Message::LoadWeather(Some(city.join(" ")))],
        ConsoleCommand::Dismiss { id } => vec![Message::DismissNotification(id)],
        ConsoleCommand::Show | ConsoleCommand::Quit => Vec::new(),
    }
}

/// Plain-text rendering of the whole page
pub fn render_page<B: Backend>(controller: &TaskListController<B>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", controller.clock_text());
    let _ = writeln!(out, "{}", render_weather(controller.weather()));

    let stats = controller.stats();
    let _ = writeln!(
        out,
        "Total {} | Completed {} | Pending {} | Overdue {}",
        stats.total, stats.completed, stats.pending, stats.overdue
    );
    let _ = writeln!(out);

    let list = controller.list();
    let _ = writeln!(out, "Tasks (filter: {})", controller.filter());
    if list.empty_state_visible() {
        if stats.total == 0 {
            let _ = writeln!(out, "  No tasks yet. Add one above!");
        } else {
            // The backend has tasks this session never loaded
            let _ = writeln!(
                out,
                "  {} task(s) on the server are not listed here (use --tasks to load them)",
                stats.total
            );
        }
    }
    for node in list.visible() {
        let Some(task) = controller.task(&node.task_id) else {
            continue;
        };
        let _ = write!(
            out,
            "  [{}] #{} {} {} {}",
            if node.checked { "x" } else { " " },
            node.task_id,
            task.name,
            node.priority.badge(),
            node.priority.tier()
        );
        if let Some(due) = node.due_date {
            let _ = write!(out, "  due {due}");
            if node.overdue {
                let _ = write!(out, " OVERDUE");
            }
        }
        let _ = writeln!(out, "  (created {})", node.created_label());
        if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "      {description}");
        }
    }
    let hidden = list.len() - list.visible().count();
    if hidden > 0 {
        let _ = writeln!(out, "  ({hidden} hidden by filter)");
    }

    let form = controller.form();
    let _ = writeln!(
        out,
        "\nDescription: {}/{} characters, earliest due date {}",
        form.char_count(),
        controller.config().ui.description_max_len,
        form.min_due_date()
    );

    for toast in controller.toasts().active() {
        let _ = writeln!(
            out,
            "  {} [{}] {}",
            toast.severity.symbol(),
            toast.id,
            toast.message
        );
    }

    if let Some(question) = controller.pending_confirmation() {
        let _ = writeln!(out, "\n{question} [y/N]");
    }

    out
}

fn render_weather(panel: &WeatherPanel) -> String {
    match panel {
        WeatherPanel::Empty => "Weather: -".to_string(),
        WeatherPanel::Loading => "Weather: Loading...".to_string(),
        WeatherPanel::Ready(w) => format!(
            "Weather: {} {}°C {} | 💧 {}% 💨 {} m/s",
            w.city, w.temperature, w.description, w.humidity, w.wind_speed
        ),
        WeatherPanel::Error(message) => format!("Weather: {message}"),
    }
}
