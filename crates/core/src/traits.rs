//! Collaborator trait definitions
//!
//! These traits describe the two ways of reaching the storage service: the
//! service API itself ([`ObjectStore`]) and an external upload tool
//! ([`UploadTool`]). The flows only see the traits, so they can be mocked.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Canned ACL applied to an uploaded object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectAcl {
    /// Owner gets full control, nobody else has access
    #[default]
    Private,
}

impl ObjectAcl {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
        }
    }
}

/// Grants sent along with a create-bucket request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketGrants {
    pub full_control: &'static str,
    pub read: &'static str,
    pub read_acp: &'static str,
    pub write: &'static str,
    pub write_acp: &'static str,
}

impl BucketGrants {
    /// Grant set used by bucket creation
    pub const DEFAULT: Self = Self {
        full_control: "GrantFullControl",
        read: "GrantRead",
        read_acp: "GrantReadACP",
        write: "GrantWrite",
        write_acp: "GrantWriteACP",
    };
}

impl Default for BucketGrants {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Result of a managed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Object key written
    pub key: String,

    /// Bytes sent
    pub size_bytes: u64,

    /// Number of parts (1 for a single-request upload)
    pub parts: usize,

    /// ETag returned by the service
    pub etag: Option<String>,
}

/// Storage service operations used by the SDK-backed flow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check if a bucket exists
    ///
    /// A not-found response is `Ok(false)`; any other failure is an error.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Create a bucket with a private ACL and the given grants
    ///
    /// Returns a printable rendering of the service response.
    async fn create_bucket(&self, bucket: &str, grants: &BucketGrants) -> Result<String>;

    /// Upload an open file, splitting it into parts when it is large
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        acl: ObjectAcl,
        file: tokio::fs::File,
    ) -> Result<UploadOutcome>;
}

/// External upload tool used by the CLI-backed flow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadTool: Send + Sync {
    /// Return a handle to the named bucket, creating the bucket if needed
    async fn get_or_create_bucket(&self, name: &str) -> Result<Box<dyn ToolBucket>>;
}

/// Bucket handle returned by an [`UploadTool`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolBucket: Send + Sync {
    /// Upload a local file to `target` inside this bucket
    async fn upload(&self, source: &Path, target: &str) -> Result<()>;
}
