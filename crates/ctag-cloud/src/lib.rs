mod error;
pub use error::CloudError;

mod util;

pub mod proc;
pub use proc::AwsCli;

pub mod metadata;
pub use metadata::{DEFAULT_METADATA_URL, InstanceIdentity, MetadataClient};

pub mod tag;
pub use tag::{Ec2Tagger, InstanceTagger, TagRequest, apply_name_tag};

pub mod dns;
pub use dns::{ARecord, DnsPublisher, Route53Publisher};
