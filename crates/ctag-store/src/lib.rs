mod store;
pub use store::{CreateOutcome, ReadOutcome, SlotStore};

mod etcd;
pub use etcd::EtcdClient;

mod config;
pub use config::{DEFAULT_ENDPOINT, DEFAULT_MAX_REDIRECTS, StoreConfig};

mod errors;
pub use errors::StoreError;
