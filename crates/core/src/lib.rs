//! upload-core: Core library for the s3-upload CLI
//!
//! This crate provides the core functionality for s3-upload, including:
//! - The upload request and credential resolution
//! - Collaborator traits for the object store and the external upload tool
//! - Event logging
//! - The CLI-backed and SDK-backed upload flows
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! so the flows can be exercised against mocks.

pub mod error;
pub mod events;
pub mod flow;
pub mod request;
pub mod traits;

pub use error::{Error, Result};
pub use events::{EventSink, TracingSink};
pub use flow::{cli_upload, sdk_upload};
pub use request::{ACCESS_KEY_VAR, Credentials, SECRET_KEY_VAR, UploadMethod, UploadRequest};
pub use traits::{BucketGrants, ObjectAcl, ObjectStore, ToolBucket, UploadOutcome, UploadTool};
