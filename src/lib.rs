//! Client models for the Apillon storage API.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;

pub use crate::core::config::ApillonConfig;
pub use crate::core::error::{AppError, Result};
pub use crate::features::storage::{File, FileData, FileStatus, StorageContentType};
pub use crate::modules::api::{ApiTransport, ApillonApi};
pub use crate::shared::model::ApillonModel;
