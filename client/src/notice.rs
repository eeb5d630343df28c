use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use tracing::{info, warn};

use crate::error::PanelError;

/// Tiempo que un aviso sigue visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(2);

/// Texto fijo cuando la respuesta ni siquiera llegó.
pub const TRANSPORT_FAILURE: &str = "no se pudo contactar con el backend";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&PanelError> for Notice {
    fn from(err: &PanelError) -> Self {
        let text = match err {
            PanelError::Transport(_) => TRANSPORT_FAILURE.to_string(),
            other => other.to_string(),
        };
        Notice {
            level: NoticeLevel::Error,
            text,
            raised_at: Instant::now(),
        }
    }
}

/// Último aviso transitorio del panel (se auto-descarta pasado el TTL).
#[derive(Debug)]
pub struct Notifier {
    current: Mutex<Option<Notice>>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }
}

impl Notifier {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            current: Mutex::new(None),
            ttl,
        }
    }

    pub fn info(&self, text: impl Into<String>) {
        let text = text.into();
        info!("aviso: {}", text);
        self.set(Notice {
            level: NoticeLevel::Info,
            text,
            raised_at: Instant::now(),
        });
    }

    pub fn error(&self, err: &PanelError) {
        warn!("aviso de error: {}", err);
        self.set(Notice::from(err));
    }

    fn set(&self, notice: Notice) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice);
    }

    /// Aviso visible ahora mismo, si no expiró.
    pub fn active(&self) -> Option<Notice> {
        self.active_at(Instant::now())
    }

    pub fn active_at(&self, now: Instant) -> Option<Notice> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.raised_at) < self.ttl)
            .cloned()
    }

    /// Último aviso emitido, haya expirado o no.
    pub fn last(&self) -> Option<Notice> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ModelError;

    #[test]
    fn aviso_expira_tras_el_ttl() {
        let n = Notifier::default();
        n.info("success");
        let raised = n.last().unwrap().raised_at;

        assert!(n.active_at(raised + Duration::from_millis(1999)).is_some());
        assert!(n.active_at(raised + NOTICE_TTL).is_none());
        // sigue disponible como último aviso
        assert_eq!(n.last().unwrap().text, "success");
    }

    #[test]
    fn errores_de_modelo_y_backend_usan_su_texto() {
        let n = Notifier::default();
        n.error(&PanelError::Backend {
            status: 400,
            message: "uuid/jobId缺失".into(),
        });
        assert_eq!(n.active().unwrap().text, "uuid/jobId缺失");

        n.error(&PanelError::Model(ModelError::UnknownTask("x".into())));
        let notice = n.active().unwrap();
        assert!(notice.is_error());
        assert!(notice.text.contains('x'));
    }
}
