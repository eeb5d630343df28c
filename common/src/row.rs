use crate::task::{Task, TaskId, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    /// Residente: reinicio automático ("follow").
    AutoTrigger,
    /// Residente: corriendo / pausado.
    Status,
    /// Programada: timer habilitado.
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub kind: BadgeKind,
    pub on: bool,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match (self.kind, self.on) {
            (BadgeKind::Status, true) => "corriendo",
            (BadgeKind::Status, false) => "pausado",
            (_, true) => "habilitado",
            (_, false) => "deshabilitado",
        }
    }
}

/// Acciones de una fila. Todas llevan el id de la tarea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start(TaskId),
    Stop(TaskId),
    Restart(TaskId),
    /// Habilita/deshabilita el timer; `run` es el estado destino.
    SetTrigger { id: TaskId, run: bool },
    RunOnce(TaskId),
    Edit(TaskId),
    Remove(TaskId),
}

impl Action {
    pub fn task_id(&self) -> &str {
        match self {
            Action::Start(id)
            | Action::Stop(id)
            | Action::Restart(id)
            | Action::RunOnce(id)
            | Action::Edit(id)
            | Action::Remove(id) => id,
            Action::SetTrigger { id, .. } => id,
        }
    }

    /// Si tras una llamada exitosa hay que recargar la lista.
    /// `RunOnce` no cambia nada persistido; `Edit` no llama al backend.
    pub fn reloads(&self) -> bool {
        !matches!(self, Action::RunOnce(_) | Action::Edit(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Start(_) => "iniciar",
            Action::Stop(_) => "detener",
            Action::Restart(_) => "reiniciar",
            Action::SetTrigger { run: true, .. } => "activar",
            Action::SetTrigger { run: false, .. } => "desactivar",
            Action::RunOnce(_) => "ejecutar",
            Action::Edit(_) => "editar",
            Action::Remove(_) => "eliminar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: TaskId,
    pub name: String,
    pub kind: TaskKind,
    pub badges: Vec<Badge>,
    pub actions: Vec<Action>,
}

pub fn render(task: &Task) -> Row {
    let id = task.id.clone();
    let (badges, actions) = match task.kind {
        TaskKind::Resident => (
            vec![
                Badge {
                    kind: BadgeKind::AutoTrigger,
                    on: task.auto_trigger,
                },
                Badge {
                    kind: BadgeKind::Status,
                    on: task.is_running(),
                },
            ],
            vec![
                Action::Stop(id.clone()),
                Action::Start(id.clone()),
                Action::Edit(id.clone()),
                Action::Remove(id.clone()),
            ],
        ),
        TaskKind::Scheduled => (
            vec![Badge {
                kind: BadgeKind::Trigger,
                on: task.auto_trigger,
            }],
            vec![
                Action::SetTrigger {
                    id: id.clone(),
                    run: !task.auto_trigger,
                },
                Action::RunOnce(id.clone()),
                Action::Edit(id.clone()),
                Action::Remove(id.clone()),
            ],
        ),
    };

    Row {
        id,
        name: task.name.clone(),
        kind: task.kind,
        badges,
        actions,
    }
}

impl Row {
    pub fn badge(&self, kind: BadgeKind) -> Option<Badge> {
        self.badges.iter().copied().find(|b| b.kind == kind)
    }

    /// Botón de habilitar/deshabilitar de una programada.
    pub fn trigger_toggle(&self) -> Option<&Action> {
        self.actions
            .iter()
            .find(|a| matches!(a, Action::SetTrigger { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::RunStatus;

    #[test]
    fn residente_tiene_dos_badges_y_cuatro_acciones() {
        let mut t = Task::blank(TaskKind::Resident);
        t.id = "a".into();
        t.name = "web".into();
        t.auto_trigger = true;
        t.status = RunStatus::Running;

        let row = render(&t);
        assert_eq!(
            row.badge(BadgeKind::AutoTrigger),
            Some(Badge { kind: BadgeKind::AutoTrigger, on: true })
        );
        assert_eq!(row.badge(BadgeKind::Status).map(|b| b.label()), Some("corriendo"));
        assert_eq!(
            row.actions,
            vec![
                Action::Stop("a".into()),
                Action::Start("a".into()),
                Action::Edit("a".into()),
                Action::Remove("a".into()),
            ]
        );
        assert!(row.actions.iter().all(|a| a.task_id() == "a"));
    }

    #[test]
    fn programada_invierte_el_toggle() {
        let mut t = Task::blank(TaskKind::Scheduled);
        t.id = "s".into();
        t.auto_trigger = false;

        let row = render(&t);
        assert_eq!(row.badges.len(), 1);
        assert_eq!(row.badge(BadgeKind::Trigger).map(|b| b.on), Some(false));
        let toggle = row.trigger_toggle().unwrap();
        assert_eq!(toggle, &Action::SetTrigger { id: "s".into(), run: true });
        assert_eq!(toggle.label(), "activar");
        assert_eq!(row.actions[1], Action::RunOnce("s".into()));

        t.auto_trigger = true;
        let row = render(&t);
        assert_eq!(
            row.trigger_toggle(),
            Some(&Action::SetTrigger { id: "s".into(), run: false })
        );
    }

    #[test]
    fn run_once_y_edit_no_recargan() {
        assert!(!Action::RunOnce("x".into()).reloads());
        assert!(!Action::Edit("x".into()).reloads());
        assert!(Action::Stop("x".into()).reloads());
        assert!(Action::Remove("x".into()).reloads());
        assert!(Action::SetTrigger { id: "x".into(), run: true }.reloads());
    }
}
