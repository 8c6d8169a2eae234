mod error;
pub use error::CoreError;

mod allocator;
pub use allocator::{Allocation, AllocationKind, Allocator, ClaimOutcome, ScanOutcome};

mod system;
pub use system::{DEFAULT_MACHINE_ID_PATH, read_machine_id};
