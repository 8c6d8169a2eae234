mod error;
pub use error::ModelError;

mod domain;
pub use domain::*;
