pub mod api;
pub mod classify;
pub mod endpoints;
pub mod error;
pub mod form;
pub mod row;
pub mod store;
pub mod task;

/* --------- Re-exports para que client use `common::X` --------- */

pub use api::{
    Ack, Envelope, HomePath, LogContent, LogEntry, LogQuery, RunInfo, DEFAULT_LOG_LINES,
};
pub use classify::{split, Views};
pub use endpoints::{ApiGeneration, Endpoints, RemoveKey};
pub use error::ModelError;
pub use form::{split_params, FieldVisibility, FormController, FormMode, FormState, TaskForm};
pub use row::{render, Action, Badge, BadgeKind, Row};
pub use store::{Applied, ReloadTicket, TaskStore};
pub use task::{OutputType, RunOptions, RunStatus, Task, TaskId, TaskKind};
