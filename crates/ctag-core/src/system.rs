use std::{fs, path::Path};

use ctag_model::MachineId;
use tracing::trace;

use crate::error::CoreError;

/// Where systemd keeps the persistent machine id.
pub const DEFAULT_MACHINE_ID_PATH: &str = "/etc/machine-id";

/// Read the persistent machine id of this host.
///
/// The file content is trimmed; a missing file or a blank id is fatal for the caller.
pub fn read_machine_id(path: impl AsRef<Path>) -> Result<MachineId, CoreError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CoreError::Identity {
        path: path.to_path_buf(),
        source,
    })?;

    let id = MachineId::new(raw).map_err(|_| CoreError::EmptyIdentity {
        path: path.to_path_buf(),
    })?;
    trace!(path = %path.display(), machine = %id, "machine id loaded");
    Ok(id)
}
