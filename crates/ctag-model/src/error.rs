use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("machine id is empty")]
    EmptyMachineId,

    #[error("namespace bound must be at least 2, got {0}")]
    NamespaceTooSmall(u32),

    #[error("slot index {index} is outside namespace [1, {bound})")]
    IndexOutOfRange { index: u32, bound: u32 },

    #[error("directory prefix must start with `/`, got `{0}`")]
    InvalidPrefix(String),
}
