use thiserror::Error;

/// Erreur du cœur de calcul (pur, déterministe).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl PlanError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}
