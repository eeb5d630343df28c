use serde::{Deserialize, Serialize};

use crate::task::TaskId;

/// Líneas que pide el visor de logs si no se indica otra cosa.
pub const DEFAULT_LOG_LINES: u32 = 200;

/* --------- Respuestas --------- */

/// Casi todas las respuestas vienen envueltas en `{"message": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: T,
}

/// Respuesta de un endpoint que muta estado: sólo trae el texto a mostrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

/// Uptime del backend. Las cadenas ya vienen formateadas por el servidor;
/// el cliente no hace aritmética de tiempos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default)]
    pub start: String,
    #[serde(rename = "runTime", default)]
    pub run_time: String,
}

impl RunInfo {
    pub fn uptime_line(&self) -> String {
        format!("iniciado {} | en ejecución {}", self.start, self.run_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "uuid")]
    pub id: TaskId,
    #[serde(rename = "jobName", default)]
    pub name: String,
    #[serde(rename = "hasLog", default)]
    pub has_log: bool,
    #[serde(rename = "logPath", default)]
    pub log_path: String,
    #[serde(default)]
    pub size: i64,
    #[serde(rename = "modTime", default)]
    pub mod_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogContent {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePath {
    #[serde(default)]
    pub home: String,
}

/* --------- Peticiones --------- */

/// Query de `job-log`. `lines` y `bytes` se omiten si son cero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogQuery {
    #[serde(rename = "jobId")]
    pub job_id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

impl LogQuery {
    pub fn new(job_id: impl Into<TaskId>) -> Self {
        Self {
            job_id: job_id.into(),
            lines: Some(DEFAULT_LOG_LINES),
            bytes: None,
        }
    }

    pub fn lines(mut self, lines: u32) -> Self {
        self.lines = Some(lines).filter(|n| *n > 0);
        self
    }

    pub fn bytes(mut self, bytes: u64) -> Self {
        self.bytes = Some(bytes).filter(|n| *n > 0);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobIdBody<'a> {
    #[serde(rename = "jobId")]
    pub job_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskIdBody<'a> {
    #[serde(rename = "taskId")]
    pub task_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerBody<'a> {
    pub uuid: &'a str,
    pub run: bool,
}

/// Cuerpo de `remove-task`; la clave cambia según la versión de la API.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RemoveBody<'a> {
    Uuid {
        uuid: &'a str,
    },
    JobId {
        #[serde(rename = "jobId")]
        job_id: &'a str,
    },
}
