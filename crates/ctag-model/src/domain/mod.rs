mod machine_id;
pub use machine_id::MachineId;

mod slot;
pub use slot::{DEFAULT_NAMESPACE_BOUND, Namespace, SlotIndex, SlotLayout};

mod naming;
pub use naming::{DNS_RECORD_TTL, DnsZone, NamingScheme};
