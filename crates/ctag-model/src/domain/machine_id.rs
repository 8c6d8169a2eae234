use std::fmt;

use crate::ModelError;

/// Persistent identity of the host running the agent.
///
/// Stored trimmed and guaranteed non-empty. This is the value written into a slot
/// when the host claims it, and the value compared against when rediscovering it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MachineId(String);

impl MachineId {
    /// Build a machine id from raw text, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ModelError> {
        let id = raw.as_ref().trim();
        if id.is_empty() {
            return Err(ModelError::EmptyMachineId);
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MachineId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MachineId> for String {
    fn from(id: MachineId) -> Self {
        id.0
    }
}

impl AsRef<str> for MachineId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MachineId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
