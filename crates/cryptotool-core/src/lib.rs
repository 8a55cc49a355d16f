pub mod config;
pub mod error;

pub use config::CryptotoolConfig;
pub use error::{CoreError, CoreResult};
