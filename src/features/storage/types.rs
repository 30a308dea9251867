use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A numeric code or symbolic name with no matching enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Lifecycle state of a stored file as reported by the backend.
///
/// On the wire the status is its numeric code; filters and query strings
/// use the symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum FileStatus {
    RequestForUploadGenerated,
    UploadedToS3,
    UploadedToIpfs,
    PinnedToCrust,
}

impl FileStatus {
    pub const ALL: [FileStatus; 4] = [
        FileStatus::RequestForUploadGenerated,
        FileStatus::UploadedToS3,
        FileStatus::UploadedToIpfs,
        FileStatus::PinnedToCrust,
    ];

    pub fn code(self) -> i64 {
        match self {
            FileStatus::RequestForUploadGenerated => 1,
            FileStatus::UploadedToS3 => 2,
            FileStatus::UploadedToIpfs => 3,
            FileStatus::PinnedToCrust => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FileStatus::RequestForUploadGenerated => "REQUEST_FOR_UPLOAD_GENERATED",
            FileStatus::UploadedToS3 => "UPLOADED_TO_S3",
            FileStatus::UploadedToIpfs => "UPLOADED_TO_IPFS",
            FileStatus::PinnedToCrust => "PINNED_TO_CRUST",
        }
    }
}

impl TryFrom<i64> for FileStatus {
    type Error = UnknownVariant;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| UnknownVariant {
                kind: "FileStatus",
                value: code.to_string(),
            })
    }
}

impl From<FileStatus> for i64 {
    fn from(status: FileStatus) -> Self {
        status.code()
    }
}

impl FromStr for FileStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "FileStatus",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of entry in a bucket's storage hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum StorageContentType {
    #[default]
    File,
    Directory,
}

impl StorageContentType {
    pub fn code(self) -> i64 {
        match self {
            StorageContentType::File => 1,
            StorageContentType::Directory => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StorageContentType::File => "FILE",
            StorageContentType::Directory => "DIRECTORY",
        }
    }
}

impl TryFrom<i64> for StorageContentType {
    type Error = UnknownVariant;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(StorageContentType::File),
            2 => Ok(StorageContentType::Directory),
            _ => Err(UnknownVariant {
                kind: "StorageContentType",
                value: code.to_string(),
            }),
        }
    }
}

impl From<StorageContentType> for i64 {
    fn from(content_type: StorageContentType) -> Self {
        content_type.code()
    }
}

impl FromStr for StorageContentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FILE" => Ok(StorageContentType::File),
            "DIRECTORY" => Ok(StorageContentType::Directory),
            _ => Err(UnknownVariant {
                kind: "StorageContentType",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
