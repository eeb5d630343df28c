use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use crate::task::Task;

/// Número de secuencia de una recarga en curso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// La lista se reemplazó; trae el nuevo tamaño.
    Replaced(usize),
    /// Ya había empezado una recarga más nueva; el resultado se descarta.
    Superseded,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: Arc<Vec<Task>>,
    applied: u64,
}

/// Lista de tareas en memoria. Siempre se reemplaza entera: quien lee con
/// `snapshot()` ve la lista vieja o la nueva, nunca una mezcla.
#[derive(Debug, Default)]
pub struct TaskStore {
    inner: Mutex<Inner>,
    started: AtomicU64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_reload(&self) -> ReloadTicket {
        ReloadTicket(self.started.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Aplica el resultado de una recarga si sigue siendo la más nueva que
    /// se inició.
    pub fn apply(&self, ticket: ReloadTicket, tasks: Vec<Task>) -> Applied {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let newest = self.started.load(Ordering::SeqCst);
        if ticket.0 != newest || ticket.0 <= inner.applied {
            return Applied::Superseded;
        }
        let len = tasks.len();
        inner.tasks = Arc::new(tasks);
        inner.applied = ticket.0;
        Applied::Replaced(len)
    }

    pub fn snapshot(&self) -> Arc<Vec<Task>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&inner.tasks)
    }

    pub fn find(&self, id: &str) -> Option<Task> {
        self.snapshot().iter().find(|t| t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
