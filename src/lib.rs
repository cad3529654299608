//! todolist - console controller for a to-do list
//!
//! Renders tasks, filters them and keeps the view in step with a task
//! backend that exposes `/add`, `/update/{id}`, `/remove/{id}`, `/stats`
//! and `/weather` over HTTP. The backend owns every task; this crate only
//! holds a last-known-good copy of what it has accepted.

pub mod api;
pub mod config;
pub mod console;
pub mod controller;
pub mod filter;
pub mod models;
pub mod notify;
pub mod render;
pub mod view;

pub use api::{ApiError, Backend, HttpBackend};
pub use config::Config;
pub use controller::{ListEvent, ListTarget, Message, TaskListController};
