use std::{sync::Arc, time::Duration};

use common::RunInfo;
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

use crate::remote::Remote;

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Consulta `run-info` a intervalo fijo y publica el último uptime.
///
/// Sin backoff ni pausa: si un tick falla se ignora (sólo log) y se vuelve
/// a intentar en el siguiente.
pub struct Heartbeat<R> {
    remote: Arc<R>,
    every: Duration,
    tx: watch::Sender<Option<RunInfo>>,
}

impl<R: Remote + 'static> Heartbeat<R> {
    pub fn new(remote: Arc<R>, every: Duration) -> (Self, watch::Receiver<Option<RunInfo>>) {
        let (tx, rx) = watch::channel(None);
        (Self { remote, every, tx }, rx)
    }

    /// Un solo tick. Devuelve si se pudo actualizar el uptime.
    pub async fn tick(&self) -> bool {
        match self.remote.run_info().await {
            Ok(info) => {
                self.tx.send_replace(Some(info));
                true
            }
            Err(err) => {
                debug!("tick de run-info fallido, se reintenta: {}", err);
                false
            }
        }
    }

    /// Loop infinito en segundo plano; termina cuando no quedan receptores.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if self.tx.is_closed() {
                    debug!("heartbeat sin receptores, saliendo");
                    break;
                }
                self.tick().await;
            }
        })
    }
}
