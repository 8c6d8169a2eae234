use std::fmt;

use crate::ModelError;

/// Default namespace bound: slots `1..100` are usable.
pub const DEFAULT_NAMESPACE_BOUND: u32 = 100;

/// Index of a slot in the allocation namespace.
///
/// Valid indices start at 1; 0 is never handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u32);

impl SlotIndex {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounded index namespace `[1, bound)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    bound: u32,
}

impl Namespace {
    /// Create a namespace with the given exclusive upper bound.
    ///
    /// A bound below 2 would leave no usable slot and is rejected.
    pub fn new(bound: u32) -> Result<Self, ModelError> {
        if bound < 2 {
            return Err(ModelError::NamespaceTooSmall(bound));
        }
        Ok(Self { bound })
    }

    /// Exclusive upper bound of the namespace.
    pub fn bound(&self) -> u32 {
        self.bound
    }

    /// Validate a raw index against this namespace. This is the only way to obtain an
    /// arbitrary `SlotIndex`.
    pub fn index(&self, raw: u32) -> Result<SlotIndex, ModelError> {
        if raw == 0 || raw >= self.bound {
            return Err(ModelError::IndexOutOfRange {
                index: raw,
                bound: self.bound,
            });
        }
        Ok(SlotIndex(raw))
    }

    /// Every index of the namespace in increasing order.
    pub fn indices(&self) -> impl Iterator<Item = SlotIndex> + use<> {
        (1..self.bound).map(SlotIndex)
    }

    /// Indices from `start` (inclusive) to the bound, in increasing order.
    pub fn indices_from(&self, start: SlotIndex) -> impl Iterator<Item = SlotIndex> + use<> {
        (start.0.max(1)..self.bound).map(SlotIndex)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            bound: DEFAULT_NAMESPACE_BOUND,
        }
    }
}

/// Key layout of the slots inside the coordination store.
///
/// A slot lives at `{prefix}/{tag_prefix}{tag_name}/{index}`, e.g.
/// `/cloudtag/machine-Name/7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLayout {
    prefix: String,
    tag_prefix: String,
    tag_name: String,
}

impl SlotLayout {
    /// Build a layout. The directory prefix must be absolute; a trailing `/` is dropped.
    pub fn new(
        prefix: impl Into<String>,
        tag_prefix: impl Into<String>,
        tag_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let prefix = prefix.into();
        if !prefix.starts_with('/') {
            return Err(ModelError::InvalidPrefix(prefix));
        }
        Ok(Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            tag_prefix: tag_prefix.into(),
            tag_name: tag_name.into(),
        })
    }

    /// Directory holding every slot of this layout.
    pub fn directory(&self) -> String {
        format!("{}/{}{}", self.prefix, self.tag_prefix, self.tag_name)
    }

    /// Store key of a single slot.
    pub fn key(&self, index: SlotIndex) -> String {
        format!("{}/{}", self.directory(), index)
    }
}
