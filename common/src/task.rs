use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;

pub type TaskId = String;

/// Tipo de tarea tal como lo manda el backend en el campo `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskKind {
    /// Proceso de larga duración que se arranca/detiene a mano.
    Resident,
    /// Tarea disparada por una expresión tipo cron.
    Scheduled,
}

impl TryFrom<u8> for TaskKind {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TaskKind::Resident),
            2 => Ok(TaskKind::Scheduled),
            other => Err(ModelError::UnknownKind(other)),
        }
    }
}

impl From<TaskKind> for u8 {
    fn from(kind: TaskKind) -> u8 {
        match kind {
            TaskKind::Resident => 1,
            TaskKind::Scheduled => 2,
        }
    }
}

/// Estado de ejecución reportado por el servidor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum RunStatus {
    #[default]
    Paused,
    Running,
}

impl From<u8> for RunStatus {
    fn from(value: u8) -> Self {
        if value == 1 {
            RunStatus::Running
        } else {
            RunStatus::Paused
        }
    }
}

impl From<RunStatus> for u8 {
    fn from(status: RunStatus) -> u8 {
        match status {
            RunStatus::Paused => 0,
            RunStatus::Running => 1,
        }
    }
}

/// Destino de los logs de la tarea. Cualquier valor distinto de 2 se trata
/// como Discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OutputType {
    #[default]
    Discard,
    FileDir,
}

impl From<u8> for OutputType {
    fn from(value: u8) -> Self {
        if value == 2 {
            OutputType::FileDir
        } else {
            OutputType::Discard
        }
    }
}

impl From<OutputType> for u8 {
    fn from(output: OutputType) -> u8 {
        match output {
            OutputType::Discard => 1,
            OutputType::FileDir => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunOptions {
    pub output_type: OutputType,
    pub output_path: String,
    /// Fallos consecutivos antes de que el backend deje de reiniciar.
    pub max_failures: u32,
    pub shell_path: String,
    pub min_run_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "uuid", default)]
    pub id: TaskId,
    #[serde(rename = "jobName", default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,

    /// Residente: "follow" (reinicio automático). Programada: timer activo.
    #[serde(rename = "run", default)]
    pub auto_trigger: bool,
    #[serde(default)]
    pub status: RunStatus,

    /// Expresión cron, sólo para `Scheduled`.
    #[serde(rename = "spec", default)]
    pub schedule: String,
    #[serde(rename = "binPath", default)]
    pub bin_path: String,
    #[serde(rename = "dir", default)]
    pub work_dir: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: RunOptions,
    #[serde(default)]
    pub link: String,

    /// -------- Datos de la última ejecución (sólo lectura) --------
    #[serde(rename = "lastStart", default)]
    pub last_start: Option<DateTime<Utc>>,
    #[serde(rename = "lastExit", default)]
    pub last_exit: Option<DateTime<Utc>>,
    #[serde(rename = "lastExitCode", default)]
    pub last_exit_code: i32,
    #[serde(rename = "lastDuration", default)]
    pub last_duration_ns: i64,
}

impl Task {
    /// Plantilla vacía de un tipo dado, sin id (todavía no guardada).
    pub fn blank(kind: TaskKind) -> Self {
        Self {
            id: TaskId::new(),
            name: String::new(),
            kind,
            auto_trigger: false,
            status: RunStatus::Paused,
            schedule: String::new(),
            bin_path: String::new(),
            work_dir: String::new(),
            params: Vec::new(),
            options: RunOptions::default(),
            link: String::new(),
            last_start: None,
            last_exit: None,
            last_exit_code: 0,
            last_duration_ns: 0,
        }
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Último arranque, ignorando el "tiempo cero" que manda el backend
    /// cuando la tarea nunca corrió.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.last_start.filter(|t| t.year() > 1)
    }

    pub fn exited_at(&self) -> Option<DateTime<Utc>> {
        self.last_exit.filter(|t| t.year() > 1)
    }
}

fn null_as_empty<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(de)?.unwrap_or_default())
}

fn null_as_default<'de, D>(de: D) -> Result<RunOptions, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RunOptions>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodifica_tarea_del_backend() {
        let raw = json!({
            "uuid": "a1",
            "jobName": "sync",
            "type": 2,
            "run": true,
            "status": 0,
            "spec": "*/5 * * * *",
            "binPath": "/usr/bin/rsync",
            "dir": "/srv",
            "params": ["-a", "src", "dst"],
            "options": {"outputType": 2, "outputPath": "/var/log", "maxFailures": 3},
            "lastStart": "0001-01-01T00:00:00Z",
            "lastExitCode": 0
        });

        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(task.id, "a1");
        assert_eq!(task.kind, TaskKind::Scheduled);
        assert!(task.auto_trigger);
        assert_eq!(task.status, RunStatus::Paused);
        assert_eq!(task.params, vec!["-a", "src", "dst"]);
        assert_eq!(task.options.output_type, OutputType::FileDir);
        assert_eq!(task.options.max_failures, 3);
        // tiempo cero de Go = nunca arrancó
        assert!(task.last_start.is_some());
        assert_eq!(task.started_at(), None);
    }

    #[test]
    fn params_y_options_nulos_quedan_vacios() {
        let raw = json!({
            "uuid": "b",
            "jobName": "web",
            "type": 1,
            "status": 1,
            "params": null,
            "options": null
        });

        let task: Task = serde_json::from_value(raw).unwrap();
        assert!(task.params.is_empty());
        assert_eq!(task.options, RunOptions::default());
        assert!(task.is_running());
    }

    #[test]
    fn tipo_desconocido_es_error() {
        let raw = json!({"uuid": "x", "jobName": "x", "type": 7});
        assert!(serde_json::from_value::<Task>(raw).is_err());
    }

    #[test]
    fn serializa_con_nombres_del_backend() {
        let mut task = Task::blank(TaskKind::Resident);
        task.name = "web".into();
        task.options.output_type = OutputType::Discard;

        let v = serde_json::to_value(&task).unwrap();
        assert_eq!(v["uuid"], "");
        assert_eq!(v["jobName"], "web");
        assert_eq!(v["type"], 1);
        assert_eq!(v["run"], false);
        assert_eq!(v["options"]["outputType"], 1);
        assert_eq!(v["dir"], "");
    }
}
