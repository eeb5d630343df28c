//! Backend en memoria para los tests del panel y del heartbeat.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use common::{Ack, LogEntry, LogQuery, RunInfo, RunStatus, Task, TaskKind};
use tokio::sync::Notify;

use crate::error::{PanelError, Result};
use crate::remote::Remote;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    RunInfo,
    Start(String),
    Stop(String),
    Restart(String),
    RunOnce(String),
    SetTrigger(String, bool),
    Save(Task),
    Remove(String),
}

#[derive(Debug, Default)]
pub struct FakeRemote {
    tasks: Mutex<Vec<Task>>,
    calls: Mutex<Vec<Call>>,
    pub fail_list: AtomicBool,
    pub fail_saves: AtomicBool,
    pub fail_run_info: AtomicBool,
    /// Si está puesto, `save_task` espera un aviso antes de contestar.
    save_gate: Option<Arc<Notify>>,
}

pub fn resident(id: &str, status: RunStatus, auto_trigger: bool) -> Task {
    let mut t = Task::blank(TaskKind::Resident);
    t.id = id.into();
    t.name = format!("job-{id}");
    t.status = status;
    t.auto_trigger = auto_trigger;
    t
}

pub fn scheduled(id: &str, auto_trigger: bool) -> Task {
    let mut t = Task::blank(TaskKind::Scheduled);
    t.id = id.into();
    t.name = format!("cron-{id}");
    t.schedule = "*/5 * * * *".into();
    t.auto_trigger = auto_trigger;
    t
}

fn ok() -> Result<Ack> {
    Ok(Ack {
        message: "success".into(),
    })
}

fn missing() -> PanelError {
    PanelError::Backend {
        status: 400,
        message: "jobId不存在".into(),
    }
}

impl FakeRemote {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    pub fn with_save_gate(mut self, gate: Arc<Notify>) -> Self {
        self.save_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutate(&self, id: &str, f: impl FnOnce(&mut Task)) -> Result<Ack> {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                f(task);
                ok()
            }
            None => Err(missing()),
        }
    }
}

#[async_trait]
impl Remote for FakeRemote {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.record(Call::List);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(PanelError::Backend {
                status: 500,
                message: "fallo interno".into(),
            });
        }
        Ok(self.tasks())
    }

    async fn run_info(&self) -> Result<RunInfo> {
        self.record(Call::RunInfo);
        if self.fail_run_info.load(Ordering::SeqCst) {
            return Err(PanelError::Backend {
                status: 503,
                message: "ocupado".into(),
            });
        }
        Ok(RunInfo {
            start: "2024-01-01 00:00:00".into(),
            run_time: "00天00时00分01秒".into(),
        })
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        Ok(Vec::new())
    }

    async fn read_log(&self, _query: &LogQuery) -> Result<String> {
        Ok(String::new())
    }

    async fn download_log(&self, _id: &str) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn start_resident(&self, id: &str) -> Result<Ack> {
        self.record(Call::Start(id.into()));
        self.mutate(id, |t| t.status = RunStatus::Running)
    }

    async fn stop_resident(&self, id: &str) -> Result<Ack> {
        self.record(Call::Stop(id.into()));
        self.mutate(id, |t| t.status = RunStatus::Paused)
    }

    async fn restart_resident(&self, id: &str) -> Result<Ack> {
        self.record(Call::Restart(id.into()));
        self.mutate(id, |t| t.status = RunStatus::Running)
    }

    async fn run_once(&self, id: &str) -> Result<Ack> {
        self.record(Call::RunOnce(id.into()));
        self.mutate(id, |_| {})
    }

    async fn set_trigger(&self, id: &str, run: bool) -> Result<Ack> {
        self.record(Call::SetTrigger(id.into(), run));
        self.mutate(id, |t| t.auto_trigger = run)
    }

    async fn save_task(&self, task: &Task) -> Result<Ack> {
        self.record(Call::Save(task.clone()));
        if let Some(gate) = &self.save_gate {
            gate.notified().await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PanelError::Backend {
                status: 200,
                message: "binPath inválido".into(),
            });
        }
        let mut tasks = self.tasks.lock().unwrap();
        let mut saved = task.clone();
        if saved.id.is_empty() {
            saved.id = uuid::Uuid::new_v4().to_string();
            tasks.push(saved);
        } else if let Some(slot) = tasks.iter_mut().find(|t| t.id == saved.id) {
            *slot = saved;
        } else {
            return Err(missing());
        }
        ok()
    }

    async fn remove_task(&self, id: &str) -> Result<Ack> {
        self.record(Call::Remove(id.into()));
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(missing());
        }
        ok()
    }

    async fn home_path(&self) -> Result<String> {
        Ok("/home/test".into())
    }
}
