use crate::error::ModelError;
use crate::task::{OutputType, Task, TaskId, TaskKind};

pub const DEFAULT_SCHEDULE: &str = "* * * * *";
pub const DEFAULT_OUTPUT_PATH: &str = "/tmp";
pub const DEFAULT_MAX_FAILURES: u32 = 5;

/// Parte el texto de parámetros por bloques de espacios.
/// Texto vacío (o sólo espacios) => secuencia vacía.
pub fn split_params(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldVisibility {
    pub schedule: bool,
    pub output_path: bool,
}

/// Campos editables del formulario de alta/edición.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub name: String,
    pub kind: TaskKind,
    pub schedule: String,
    pub bin_path: String,
    pub work_dir: String,
    pub params_text: String,
    pub output_type: OutputType,
    pub output_path: String,

    /// Registro con el que se abrió el formulario; aporta lo que no se
    /// edita (id, run, status, maxFailures...).
    base: Task,
}

impl TaskForm {
    fn defaults(kind: TaskKind) -> Self {
        let mut base = Task::blank(kind);
        base.schedule = DEFAULT_SCHEDULE.to_string();
        base.options.output_type = OutputType::Discard;
        base.options.output_path = DEFAULT_OUTPUT_PATH.to_string();
        base.options.max_failures = DEFAULT_MAX_FAILURES;
        Self::from_task(&base)
    }

    fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            kind: task.kind,
            schedule: task.schedule.clone(),
            bin_path: task.bin_path.clone(),
            work_dir: task.work_dir.clone(),
            params_text: task.params.join(" "),
            output_type: task.options.output_type,
            output_path: task.options.output_path.clone(),
            base: task.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn visibility(&self) -> FieldVisibility {
        FieldVisibility {
            schedule: self.kind == TaskKind::Scheduled,
            output_path: self.output_type == OutputType::FileDir,
        }
    }

    /// Reconstruye el registro completo (reemplazo total, no parche).
    ///
    /// Altas salen con `run = false`; en edición `run` se conserva.
    pub fn to_task(&self) -> Task {
        let mut task = self.base.clone();
        task.name = self.name.clone();
        task.kind = self.kind;
        task.schedule = self.schedule.clone();
        task.bin_path = self.bin_path.clone();
        task.work_dir = self.work_dir.clone();
        task.params = split_params(&self.params_text);
        task.options.output_type = self.output_type;
        task.options.output_path = self.output_path.clone();
        task
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormState {
    #[default]
    Closed,
    Create(TaskForm),
    Edit(TaskForm),
}

/// Un único formulario reutilizado para ambos tipos de tarea.
#[derive(Debug, Default)]
pub struct FormController {
    state: FormState,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn mode(&self) -> Option<FormMode> {
        match self.state {
            FormState::Closed => None,
            FormState::Create(_) => Some(FormMode::Create),
            FormState::Edit(_) => Some(FormMode::Edit),
        }
    }

    pub fn is_open(&self) -> bool {
        self.mode().is_some()
    }

    pub fn open_create(&mut self, kind: TaskKind) {
        self.state = FormState::Create(TaskForm::defaults(kind));
    }

    /// Abre en modo edición buscando `id` en la lista actual. Si no existe
    /// el estado no cambia.
    pub fn open_edit(&mut self, id: &str, tasks: &[Task]) -> Result<(), ModelError> {
        let task = tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ModelError::UnknownTask(TaskId::from(id)))?;
        self.state = FormState::Edit(TaskForm::from_task(task));
        Ok(())
    }

    pub fn form(&self) -> Option<&TaskForm> {
        match &self.state {
            FormState::Closed => None,
            FormState::Create(form) | FormState::Edit(form) => Some(form),
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        match &mut self.state {
            FormState::Closed => None,
            FormState::Create(form) | FormState::Edit(form) => Some(form),
        }
    }

    pub fn visibility(&self) -> Option<FieldVisibility> {
        self.form().map(TaskForm::visibility)
    }

    pub fn serialize(&self) -> Result<Task, ModelError> {
        self.form()
            .map(TaskForm::to_task)
            .ok_or(ModelError::FormClosed)
    }

    pub fn close(&mut self) {
        self.state = FormState::Closed;
    }
}
