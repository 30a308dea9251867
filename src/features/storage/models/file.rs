use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::storage::types::{FileStatus, StorageContentType};
use crate::modules::api::ApiTransport;
use crate::shared::model::{default_serialize_filter, ApillonModel, ModelBase};

/// Distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial file data, as returned by the detail endpoint or supplied by
/// the owner of a [`File`] at construction.
///
/// Absent keys leave the corresponding field untouched; an explicit
/// `null` clears it. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(rename = "CID", default, deserialize_with = "nullable")]
    pub cid: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub directory_uuid: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Option<Option<FileStatus>>,
    /// Sent by the backend as `type`; `contentType` is accepted too
    #[serde(rename = "type", alias = "contentType", default)]
    pub content_type: Option<StorageContentType>,
    /// Raw numeric status code reported by the backend
    #[serde(default)]
    pub file_status: Option<FileStatus>,
}

impl FileData {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Some(name.into()));
        self
    }

    pub fn with_cid(mut self, cid: impl Into<String>) -> Self {
        self.cid = Some(Some(cid.into()));
        self
    }

    pub fn with_file_status(mut self, file_status: FileStatus) -> Self {
        self.file_status = Some(file_status);
        self
    }

    pub fn with_content_type(mut self, content_type: StorageContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }
}

/// A file stored in a bucket's directory tree.
///
/// Fields reflect the data supplied at construction or the last
/// successful [`File::get`]. There is no local mutation; updates go
/// through the backend.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(flatten)]
    base: ModelBase,
    bucket_uuid: String,
    directory_uuid: Option<String>,
    name: Option<String>,
    #[serde(rename = "CID")]
    cid: Option<String>,
    status: Option<FileStatus>,
    /// Serialized under the backend's field name, `type`
    #[serde(rename = "type")]
    content_type: StorageContentType,
    #[serde(skip)]
    api: Arc<dyn ApiTransport>,
}

impl File {
    /// Create a file handle. Performs no network access.
    ///
    /// An empty `directory_uuid` is treated as the bucket root.
    pub fn new(
        api: Arc<dyn ApiTransport>,
        bucket_uuid: impl Into<String>,
        directory_uuid: Option<String>,
        uuid: impl Into<String>,
        data: Option<FileData>,
    ) -> Result<Self> {
        let bucket_uuid = bucket_uuid.into();
        let uuid = uuid.into();

        if bucket_uuid.is_empty() {
            return Err(AppError::Validation(
                "Bucket UUID must not be empty".to_string(),
            ));
        }
        if uuid.is_empty() {
            return Err(AppError::Validation("File UUID must not be empty".to_string()));
        }

        let api_prefix = format!("/storage/{}/file/{}", bucket_uuid, uuid);
        let mut file = Self {
            base: ModelBase::new(uuid, api_prefix),
            bucket_uuid,
            directory_uuid: directory_uuid.filter(|d| !d.is_empty()),
            name: None,
            cid: None,
            status: None,
            content_type: StorageContentType::default(),
            api,
        };

        if let Some(data) = data {
            file.populate(data);
        }

        Ok(file)
    }

    /// Refresh the file from `GET {prefix}/detail`.
    ///
    /// The response is fully decoded before any field changes, so on error
    /// the file keeps its previous values. Only `fileStatus` sets the
    /// status; a `status` key in the body is not a file status.
    pub async fn get(&mut self) -> Result<&mut Self> {
        let path = format!("{}/detail", self.api_prefix());
        let api = Arc::clone(&self.api);
        let mut body = api.get(&path).await?;

        if !body.is_object() {
            return Err(AppError::Decode(format!(
                "Expected file detail object from {}, got: {}",
                path, body
            )));
        }
        if let Some(fields) = body.as_object_mut() {
            fields.remove("status");
        }

        let data: FileData = serde_json::from_value(body)
            .map_err(|e| AppError::Decode(format!("Invalid file detail from {}: {}", path, e)))?;

        self.populate(data);
        Ok(self)
    }

    /// Merge partial data. `fileStatus` always replaces `status`; an
    /// explicit `status` key is applied afterwards and wins.
    fn populate(&mut self, data: FileData) {
        self.status = data.file_status;

        if let Some(name) = data.name {
            self.name = name;
        }
        if let Some(cid) = data.cid {
            self.cid = cid;
        }
        if let Some(directory_uuid) = data.directory_uuid {
            self.directory_uuid = directory_uuid.filter(|d| !d.is_empty());
        }
        if let Some(status) = data.status {
            self.status = status;
        }
        if let Some(content_type) = data.content_type {
            self.content_type = content_type;
        }
    }

    pub fn bucket_uuid(&self) -> &str {
        &self.bucket_uuid
    }

    pub fn directory_uuid(&self) -> Option<&str> {
        self.directory_uuid.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Content identifier (IPFS CID), once the file is stored
    pub fn cid(&self) -> Option<&str> {
        self.cid.as_deref()
    }

    pub fn status(&self) -> Option<FileStatus> {
        self.status
    }

    pub fn content_type(&self) -> StorageContentType {
        self.content_type
    }
}

impl ApillonModel for File {
    fn base(&self) -> &ModelBase {
        &self.base
    }

    /// Enum fields are emitted by name; the backend query interface does
    /// not accept their numeric codes.
    fn serialize_filter(&self, key: &str, value: &Value) -> Option<Value> {
        let kept = default_serialize_filter(key, value)?;
        let name = match key {
            "status" => kept
                .as_i64()
                .and_then(|code| FileStatus::try_from(code).ok())
                .map(FileStatus::name),
            "type" | "contentType" => kept
                .as_i64()
                .and_then(|code| StorageContentType::try_from(code).ok())
                .map(StorageContentType::name),
            _ => return Some(kept),
        };
        name.map(|name| Value::String(name.to_string()))
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("uuid", &self.base.uuid())
            .field("bucket_uuid", &self.bucket_uuid)
            .field("directory_uuid", &self.directory_uuid)
            .field("name", &self.name)
            .field("cid", &self.cid)
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
