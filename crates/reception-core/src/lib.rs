pub mod config;
pub mod error;
pub mod types;

pub use config::ReceptionConfig;
pub use error::{ReceptionError, Result};
pub use types::*;
