use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::{
    render, split, Action, Applied, FieldVisibility, FormController, FormMode, Row, TaskForm,
    TaskKind, TaskStore,
};
use tracing::{debug, info};

use crate::error::PanelError;
use crate::notice::{Notice, Notifier};
use crate::remote::Remote;

/// Filas listas para pintar, ya separadas por tipo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowViews {
    pub resident: Vec<Row>,
    pub scheduled: Vec<Row>,
}

impl RowViews {
    pub fn find(&self, id: &str) -> Option<&Row> {
        self.resident
            .iter()
            .chain(self.scheduled.iter())
            .find(|r| r.id == id)
    }
}

/// Contexto de la aplicación: dueño del store, del formulario y de los
/// avisos. Todo error termina aquí convertido en aviso; nada sube más.
pub struct Panel<R> {
    remote: Arc<R>,
    store: TaskStore,
    form: Mutex<FormController>,
    notices: Notifier,
}

impl<R: Remote> Panel<R> {
    pub fn new(remote: Arc<R>) -> Self {
        Self::with_notifier(remote, Notifier::default())
    }

    pub fn with_notifier(remote: Arc<R>, notices: Notifier) -> Self {
        Self {
            remote,
            store: TaskStore::new(),
            form: Mutex::new(FormController::new()),
            notices,
        }
    }

    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn notices(&self) -> &Notifier {
        &self.notices
    }

    /// Último aviso emitido (aunque ya haya expirado en pantalla).
    pub fn notice(&self) -> Option<Notice> {
        self.notices.last()
    }

    fn lock_form(&self) -> MutexGuard<'_, FormController> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /* ---------------- lectura ---------------- */

    /// Pide la lista completa y la reemplaza. Si falla, la lista anterior
    /// queda intacta y se avisa.
    pub async fn refresh(&self) -> bool {
        let ticket = self.store.begin_reload();
        match self.remote.list_tasks().await {
            Ok(tasks) => {
                match self.store.apply(ticket, tasks) {
                    Applied::Replaced(n) => debug!("lista recargada: {} tareas", n),
                    Applied::Superseded => {
                        debug!("recarga {:?} descartada: hay una más nueva", ticket)
                    }
                }
                true
            }
            Err(err) => {
                self.notices.error(&err);
                false
            }
        }
    }

    pub fn rows(&self) -> RowViews {
        let tasks = self.store.snapshot();
        let views = split(&tasks);
        RowViews {
            resident: views.resident.into_iter().map(render).collect(),
            scheduled: views.scheduled.into_iter().map(render).collect(),
        }
    }

    /* ---------------- acciones de fila ---------------- */

    /// Una sola llamada al backend por acción; después se recarga salvo en
    /// `RunOnce`. El mensaje del backend se muestra tal cual.
    pub async fn dispatch(&self, action: Action) {
        debug!("acción {:?}", action);
        let result = match &action {
            Action::Start(id) => self.remote.start_resident(id).await,
            Action::Stop(id) => self.remote.stop_resident(id).await,
            Action::Restart(id) => self.remote.restart_resident(id).await,
            Action::SetTrigger { id, run } => self.remote.set_trigger(id, *run).await,
            Action::RunOnce(id) => self.remote.run_once(id).await,
            Action::Remove(id) => self.remote.remove_task(id).await,
            Action::Edit(id) => {
                self.open_edit(id);
                return;
            }
        };

        match result {
            Ok(ack) => {
                self.notices.info(ack.message);
                if action.reloads() {
                    self.refresh().await;
                }
            }
            Err(err) => self.notices.error(&err),
        }
    }

    /* ---------------- formulario ---------------- */

    pub fn open_create(&self, kind: TaskKind) {
        self.lock_form().open_create(kind);
    }

    /// Abre el formulario con la tarea `id` del store actual.
    pub fn open_edit(&self, id: &str) -> bool {
        let tasks = self.store.snapshot();
        let opened = self.lock_form().open_edit(id, &tasks);
        match opened {
            Ok(()) => true,
            Err(err) => {
                self.notices.error(&PanelError::from(err));
                false
            }
        }
    }

    pub fn form_mode(&self) -> Option<FormMode> {
        self.lock_form().mode()
    }

    pub fn form(&self) -> Option<TaskForm> {
        self.lock_form().form().cloned()
    }

    pub fn form_visibility(&self) -> Option<FieldVisibility> {
        self.lock_form().visibility()
    }

    /// Modifica el formulario abierto. `None` si está cerrado.
    pub fn edit_form<T>(&self, f: impl FnOnce(&mut TaskForm) -> T) -> Option<T> {
        self.lock_form().form_mut().map(f)
    }

    pub fn cancel_form(&self) {
        self.lock_form().close();
    }

    /// Guarda el formulario. Si sale bien se cierra y se recarga; si falla
    /// queda abierto con el aviso del error. Un formulario abierto durante
    /// el guardado no se toca.
    pub async fn submit_form(&self) -> bool {
        let (submitted, serialized) = {
            let form = self.lock_form();
            (form.state().clone(), form.serialize())
        };
        let task = match serialized {
            Ok(task) => task,
            Err(err) => {
                self.notices.error(&PanelError::from(err));
                return false;
            }
        };

        match self.remote.save_task(&task).await {
            Ok(ack) => {
                info!("tarea '{}' guardada", task.name);
                self.notices.info(ack.message);
                {
                    // sólo se cierra si nadie abrió otro formulario mientras tanto
                    let mut form = self.lock_form();
                    if *form.state() == submitted {
                        form.close();
                    } else {
                        debug!("formulario cambiado durante el guardado; queda abierto");
                    }
                }
                self.refresh().await;
                true
            }
            Err(err) => {
                self.notices.error(&err);
                false
            }
        }
    }
}
