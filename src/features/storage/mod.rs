//! Apillon storage resources.
//!
//! | Method | Endpoint | Model |
//! |--------|----------|-------|
//! | GET | `/storage/{bucketUuid}/file/{fileUuid}/detail` | [`File::get`] |

pub mod models;
pub mod types;

pub use models::{File, FileData};
pub use types::{FileStatus, StorageContentType, UnknownVariant};
