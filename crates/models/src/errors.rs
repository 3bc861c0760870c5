use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Every field problem found in a payload, already joined for display.
    #[error("Dados inválidos: {0}")]
    Validation(String),
}
