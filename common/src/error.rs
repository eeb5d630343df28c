use thiserror::Error;

use crate::task::TaskId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("la tarea {0} no existe (vista desactualizada?)")]
    UnknownTask(TaskId),

    #[error("tipo de tarea desconocido: {0}")]
    UnknownKind(u8),

    #[error("el formulario está cerrado")]
    FormClosed,

    #[error("versión de API desconocida: {0} (usar v1, v2 o v3)")]
    UnknownGeneration(String),
}
