use std::time::Duration;

use async_trait::async_trait;
use common::api::{JobIdBody, RemoveBody, TaskIdBody, TriggerBody};
use common::{
    Ack, ApiGeneration, Endpoints, Envelope, HomePath, LogContent, LogEntry, LogQuery, RemoveKey,
    RunInfo, Task,
};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::PanelConfig;
use crate::error::{PanelError, Result};

/// Una llamada por cada capacidad del backend. El panel y el heartbeat sólo
/// hablan con esta interfaz.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Cadenas de uptime formateadas por el servidor.
    async fn run_info(&self) -> Result<RunInfo>;

    async fn list_logs(&self) -> Result<Vec<LogEntry>>;
    async fn read_log(&self, query: &LogQuery) -> Result<String>;
    async fn download_log(&self, id: &str) -> Result<Vec<u8>>;

    async fn start_resident(&self, id: &str) -> Result<Ack>;
    async fn stop_resident(&self, id: &str) -> Result<Ack>;
    async fn restart_resident(&self, id: &str) -> Result<Ack>;

    async fn run_once(&self, id: &str) -> Result<Ack>;
    async fn set_trigger(&self, id: &str, run: bool) -> Result<Ack>;

    async fn save_task(&self, task: &Task) -> Result<Ack>;
    async fn remove_task(&self, id: &str) -> Result<Ack>;

    async fn home_path(&self) -> Result<String>;
}

/// Cliente HTTP contra el backend real (reqwest).
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
}

impl HttpRemote {
    pub fn new(
        base_url: &str,
        generation: ApiGeneration,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints: generation.endpoints(),
        })
    }

    pub fn from_config(config: &PanelConfig) -> Result<Self> {
        Self::new(&config.base_url, config.generation, config.timeout)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        read_json(resp).await
    }

    async fn post_ack<B: Serialize + Sync + ?Sized>(&self, path: &str, body: &B) -> Result<Ack> {
        let url = self.url(path);
        debug!("POST {}", url);
        let resp = self.client.post(&url).json(body).send().await?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    if !resp.status().is_success() {
        return Err(backend_error(resp).await);
    }
    Ok(resp.json::<T>().await?)
}

/// Error con el mensaje del backend si el cuerpo trae `{"message": ...}`.
async fn backend_error(resp: Response) -> PanelError {
    let status = resp.status();
    let message = match resp.json::<Ack>().await {
        Ok(ack) if !ack.message.is_empty() => ack.message,
        _ => format!("el backend respondió {}", status),
    };
    PanelError::Backend {
        status: status.as_u16(),
        message,
    }
}

/// Decodifica `job-list` registro a registro. Un registro ilegible (p.ej.
/// `type` distinto de 1 o 2) se descarta con un warning; el resto de la
/// lista sigue valiendo.
fn decode_tasks(raw: Vec<Value>) -> Vec<Task> {
    raw.into_iter()
        .filter_map(|value| {
            let id = value
                .get("uuid")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match serde_json::from_value::<Task>(value) {
                Ok(task) => Some(task),
                Err(err) => {
                    warn!("tarea '{}' descartada de job-list: {}", id, err);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl Remote for HttpRemote {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        // el backend manda `null` cuando no hay tareas
        let env: Envelope<Option<Vec<Value>>> = self.get_json(self.endpoints.job_list).await?;
        Ok(decode_tasks(env.message.unwrap_or_default()))
    }

    async fn run_info(&self) -> Result<RunInfo> {
        self.get_json(self.endpoints.run_info).await
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        let env: Envelope<Option<Vec<LogEntry>>> =
            self.get_json(self.endpoints.job_log_list).await?;
        Ok(env.message.unwrap_or_default())
    }

    async fn read_log(&self, query: &LogQuery) -> Result<String> {
        let url = self.url(self.endpoints.job_log);
        debug!("GET {} jobId={}", url, query.job_id);
        let resp = self.client.get(&url).query(query).send().await?;
        let content: LogContent = read_json(resp).await?;
        Ok(content.content)
    }

    async fn download_log(&self, id: &str) -> Result<Vec<u8>> {
        let url = self.url(self.endpoints.job_log_download);
        debug!("GET {} jobId={}", url, id);
        let resp = self
            .client
            .get(&url)
            .query(&JobIdBody { job_id: id })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(backend_error(resp).await);
        }
        Ok(resp.bytes().await?.to_vec())
    }

    async fn start_resident(&self, id: &str) -> Result<Ack> {
        self.post_ack(self.endpoints.start_resident, &JobIdBody { job_id: id })
            .await
    }

    async fn stop_resident(&self, id: &str) -> Result<Ack> {
        self.post_ack(self.endpoints.stop_resident, &JobIdBody { job_id: id })
            .await
    }

    async fn restart_resident(&self, id: &str) -> Result<Ack> {
        let path = self
            .endpoints
            .restart_resident
            .ok_or(PanelError::Unsupported("restart-job-resident-task"))?;
        self.post_ack(path, &JobIdBody { job_id: id }).await
    }

    async fn run_once(&self, id: &str) -> Result<Ack> {
        self.post_ack(self.endpoints.run_task, &TaskIdBody { task_id: id })
            .await
    }

    async fn set_trigger(&self, id: &str, run: bool) -> Result<Ack> {
        self.post_ack(self.endpoints.set_trigger, &TriggerBody { uuid: id, run })
            .await
    }

    async fn save_task(&self, task: &Task) -> Result<Ack> {
        self.post_ack(self.endpoints.save_task, task).await
    }

    async fn remove_task(&self, id: &str) -> Result<Ack> {
        let body = match self.endpoints.remove_key {
            RemoveKey::Uuid => RemoveBody::Uuid { uuid: id },
            RemoveKey::JobId => RemoveBody::JobId { job_id: id },
        };
        self.post_ack(self.endpoints.remove_task, &body).await
    }

    async fn home_path(&self) -> Result<String> {
        let path = self
            .endpoints
            .home_path
            .ok_or(PanelError::Unsupported("home-path"))?;
        let home: HomePath = self.get_json(path).await?;
        Ok(home.home)
    }
}
