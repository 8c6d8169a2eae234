use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("metadata request failed: {0}")]
    Metadata(#[from] reqwest::Error),
    #[error("unexpected metadata reply {status} for {path}")]
    MetadataStatus { path: String, status: u16 },
    #[error("empty instance metadata {0}")]
    EmptyMetadata(String),
    #[error("invalid availability zone: {0:?}")]
    InvalidZone(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("`{command}` exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },
    #[error("`{0}` killed by signal")]
    KilledBySignal(String),
    #[error("invalid command output: {0}")]
    InvalidOutput(String),
}
