use ctag_model::{MachineId, Namespace, SlotIndex, SlotLayout};
use ctag_store::{CreateOutcome, ReadOutcome, SlotStore};
use tracing::{debug, info, instrument};

use crate::error::CoreError;

/// Outcome of the read-only scan phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The machine already owns this slot.
    Owned(SlotIndex),
    /// Lowest slot found vacant; claiming starts here.
    FreeReached(SlotIndex),
}

/// Outcome of a single claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    /// Another machine created the slot between our read and our write.
    LostRace,
}

/// How the final index was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    Rediscovered,
    Claimed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub index: SlotIndex,
    pub kind: AllocationKind,
}

/// Maps a machine id to a unique slot index in the coordination store.
///
/// The allocator holds no state of its own. Uniqueness rests entirely on the store's
/// create-if-absent being atomic: the first machine to create a slot owns it forever.
pub struct Allocator<S> {
    store: S,
    layout: SlotLayout,
    namespace: Namespace,
}

impl<S> Allocator<S>
where
    S: SlotStore,
{
    pub fn new(store: S, layout: SlotLayout, namespace: Namespace) -> Self {
        Self {
            store,
            layout,
            namespace,
        }
    }

    /// Find the slot owned by `machine`, claiming the lowest free one if it owns none.
    ///
    /// Any store error aborts the whole allocation.
    #[instrument(level = "debug", skip(self), fields(machine = %machine))]
    pub async fn find_index(&self, machine: &MachineId) -> Result<Allocation, CoreError> {
        match self.scan(machine).await? {
            ScanOutcome::Owned(index) => {
                info!(%index, "machine already owns a slot");
                Ok(Allocation {
                    index,
                    kind: AllocationKind::Rediscovered,
                })
            }
            ScanOutcome::FreeReached(start) => {
                let index = self.allocate_index(machine, start).await?;
                info!(%index, "claimed new slot");
                Ok(Allocation {
                    index,
                    kind: AllocationKind::Claimed,
                })
            }
        }
    }

    /// Read slots in increasing order until one is owned by `machine` or vacant.
    pub async fn scan(&self, machine: &MachineId) -> Result<ScanOutcome, CoreError> {
        for index in self.namespace.indices() {
            let key = self.layout.key(index);
            match self.store.read(&key).await? {
                ReadOutcome::Found(owner) if machine == owner.as_str() => {
                    return Ok(ScanOutcome::Owned(index));
                }
                ReadOutcome::Found(owner) => {
                    debug!(%index, %owner, "slot taken");
                }
                ReadOutcome::NotFound => {
                    debug!(%index, "lowest free slot reached");
                    return Ok(ScanOutcome::FreeReached(index));
                }
            }
        }
        Err(self.exhausted())
    }

    /// Claim slots from `start` upwards until one create succeeds.
    ///
    /// Never goes back below `start`: a lost race only means a higher slot is needed.
    /// A `start` outside this allocator's namespace is rejected.
    pub async fn allocate_index(
        &self,
        machine: &MachineId,
        start: SlotIndex,
    ) -> Result<SlotIndex, CoreError> {
        let start = self.namespace.index(start.get())?;
        for index in self.namespace.indices_from(start) {
            match self.claim(machine, index).await? {
                ClaimOutcome::Claimed => return Ok(index),
                ClaimOutcome::LostRace => {
                    debug!(%index, "lost race for slot, trying next");
                }
            }
        }
        Err(self.exhausted())
    }

    /// Attempt to create a single slot with `machine` as its value.
    pub async fn claim(
        &self,
        machine: &MachineId,
        index: SlotIndex,
    ) -> Result<ClaimOutcome, CoreError> {
        let index = self.namespace.index(index.get())?;
        let key = self.layout.key(index);
        match self.store.create_if_absent(&key, machine.as_str()).await? {
            CreateOutcome::Created => Ok(ClaimOutcome::Claimed),
            CreateOutcome::AlreadyExists => Ok(ClaimOutcome::LostRace),
        }
    }

    fn exhausted(&self) -> CoreError {
        CoreError::Exhausted {
            bound: self.namespace.bound(),
        }
    }
}
