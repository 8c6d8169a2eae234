use std::path::PathBuf;

use ctag_model::ModelError;
use ctag_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("store communication failed: {0}")]
    Store(#[from] StoreError),

    #[error("slot outside the namespace: {0}")]
    Slot(#[from] ModelError),

    #[error("cannot find machine index: all slots below {bound} are busy")]
    Exhausted { bound: u32 },

    #[error("failed to read machine id from {}: {source}", path.display())]
    Identity {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("empty machine id read from {}", path.display())]
    EmptyIdentity { path: PathBuf },
}

impl CoreError {
    /// Returns `true` when the namespace is full, as opposed to the store being unreachable.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, CoreError::Exhausted { .. })
    }
}
