use common::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    /// No hubo respuesta utilizable (red caída, timeout, cuerpo ilegible).
    #[error("error de transporte: {0}")]
    Transport(#[from] reqwest::Error),

    /// El backend respondió con error y su propio mensaje.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("el endpoint {0} no existe en esta versión de la API")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, PanelError>;
