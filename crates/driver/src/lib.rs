//! TelDrive storage driver.
//!
//! Wires [`teldrive_client::ApiClient`] and the resumable
//! [`teldrive_upload::Uploader`] behind the [`Storage`] trait, and loads
//! the driver settings from TOML.

pub mod config;
pub mod driver;
pub mod error;
pub mod object;
pub mod storage;

// Re-export primary types for convenience.
pub use config::{ConfigError, DriverConfig, default_config_path};
pub use driver::TelDrive;
pub use error::StorageError;
pub use object::{Object, ROOT_ID};
pub use storage::{FileStream, Link, Storage, StorageFuture};
