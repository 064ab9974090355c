//! Managed upload
//!
//! Small files go up in one PutObject. Files larger than one part are split
//! into sequential multipart parts; a failed multipart upload is aborted so
//! no orphaned parts are left behind.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart, ObjectCannedAcl};
use aws_smithy_types::byte_stream::Length;

use upload_core::{Error, Result, UploadOutcome};

use crate::client::network_error;

/// Default part size: 64 MiB
pub const DEFAULT_PART_SIZE: u64 = 64 * 1024 * 1024;

/// Minimum part size: 5 MiB (S3 requirement)
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum part size: 5 GiB
pub const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Maximum number of parts: 10,000 (S3 limit)
pub const MAX_PARTS: usize = 10_000;

/// Multipart upload configuration
#[derive(Debug, Clone)]
pub struct MultipartConfig {
    /// Part size in bytes
    pub part_size: u64,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
        }
    }
}

impl MultipartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part_size(mut self, size: u64) -> Self {
        self.part_size = size.clamp(MIN_PART_SIZE, MAX_PART_SIZE);
        self
    }

    /// Calculate appropriate part size for a file
    pub fn calculate_part_size(&self, file_size: u64) -> u64 {
        // If file fits in one part, use minimum
        if file_size <= MIN_PART_SIZE {
            return MIN_PART_SIZE;
        }

        let parts = file_size.div_ceil(self.part_size);

        if parts <= MAX_PARTS as u64 {
            self.part_size
        } else {
            // Need larger parts to fit within 10,000 limit
            let required_size = file_size.div_ceil(MAX_PARTS as u64);
            required_size.clamp(MIN_PART_SIZE, MAX_PART_SIZE)
        }
    }
}

/// Calculate number of parts for a file
pub fn calculate_parts(file_size: u64, part_size: u64) -> usize {
    file_size.div_ceil(part_size) as usize
}

/// Get byte range for a part
pub fn part_byte_range(part_number: i32, part_size: u64, total_size: u64) -> (u64, u64) {
    let start = (part_number as u64 - 1) * part_size;
    let end = (start + part_size).min(total_size);
    (start, end)
}

/// One file upload to one object key
pub(crate) struct ManagedUpload<'a> {
    pub client: &'a aws_sdk_s3::Client,
    pub config: &'a MultipartConfig,
    pub bucket: &'a str,
    pub key: &'a str,
    pub acl: ObjectCannedAcl,
}

impl ManagedUpload<'_> {
    /// Upload the file, consuming (and closing) the handle on every path
    ///
    /// Only regular files are accepted: the upload is sized from the file's
    /// metadata, which is zero for pipes and devices.
    pub async fn run(self, file: tokio::fs::File) -> Result<UploadOutcome> {
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(Error::General("source is not a regular file".into()));
        }
        let size = metadata.len();
        let part_size = self.config.calculate_part_size(size);
        let content_type = mime_guess::from_path(self.key)
            .first_or_octet_stream()
            .to_string();

        tracing::debug!(
            bucket = self.bucket,
            key = self.key,
            size = %humansize::format_size(size, humansize::BINARY),
            "starting managed upload"
        );

        if size <= part_size {
            return self.put_single(file, size, &content_type).await;
        }

        let upload_id = self.create(&content_type).await?;
        match self.upload_parts(&file, &upload_id, size, part_size).await {
            Ok(parts) => {
                let count = parts.len();
                match self.complete(&upload_id, parts).await {
                    Ok(etag) => Ok(UploadOutcome {
                        key: self.key.to_string(),
                        size_bytes: size,
                        parts: count,
                        etag,
                    }),
                    Err(e) => {
                        self.abort(&upload_id).await;
                        Err(e)
                    }
                }
            }
            Err(e) => {
                self.abort(&upload_id).await;
                Err(e)
            }
        }
    }

    async fn put_single(
        &self,
        file: tokio::fs::File,
        size: u64,
        content_type: &str,
    ) -> Result<UploadOutcome> {
        let body = ByteStream::read_from()
            .file(file)
            .length(Length::Exact(size))
            .build()
            .await
            .map_err(|e| Error::General(format!("failed to read source file: {e}")))?;

        let response = self
            .client
            .put_object()
            .bucket(self.bucket)
            .key(self.key)
            .acl(self.acl.clone())
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| network_error(&e))?;

        Ok(UploadOutcome {
            key: self.key.to_string(),
            size_bytes: size,
            parts: 1,
            etag: response.e_tag().map(|etag| etag.trim_matches('"').to_string()),
        })
    }

    async fn create(&self, content_type: &str) -> Result<String> {
        let response = self
            .client
            .create_multipart_upload()
            .bucket(self.bucket)
            .key(self.key)
            .acl(self.acl.clone())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| network_error(&e))?;

        response
            .upload_id()
            .map(str::to_string)
            .ok_or_else(|| Error::Network("CreateMultipartUpload returned no upload id".into()))
    }

    async fn upload_parts(
        &self,
        file: &tokio::fs::File,
        upload_id: &str,
        size: u64,
        part_size: u64,
    ) -> Result<Vec<CompletedPart>> {
        let total = calculate_parts(size, part_size);
        let mut parts = Vec::with_capacity(total);

        // total never exceeds MAX_PARTS, so part numbers fit in i32
        for part_number in 1..=total as i32 {
            let (start, end) = part_byte_range(part_number, part_size, size);
            let body = ByteStream::read_from()
                .file(file.try_clone().await?)
                .offset(start)
                .length(Length::Exact(end - start))
                .build()
                .await
                .map_err(|e| Error::General(format!("failed to read part {part_number}: {e}")))?;

            let response = self
                .client
                .upload_part()
                .bucket(self.bucket)
                .key(self.key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(body)
                .send()
                .await
                .map_err(|e| network_error(&e))?;

            parts.push(
                CompletedPart::builder()
                    .e_tag(response.e_tag().unwrap_or_default())
                    .part_number(part_number)
                    .build(),
            );
            tracing::debug!(part_number, total, "part uploaded");
        }

        Ok(parts)
    }

    async fn complete(
        &self,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<Option<String>> {
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();

        let response = self
            .client
            .complete_multipart_upload()
            .bucket(self.bucket)
            .key(self.key)
            .upload_id(upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(|e| network_error(&e))?;

        Ok(response
            .e_tag()
            .map(|etag| etag.trim_matches('"').to_string()))
    }

    async fn abort(&self, upload_id: &str) {
        let result = self
            .client
            .abort_multipart_upload()
            .bucket(self.bucket)
            .key(self.key)
            .upload_id(upload_id)
            .send()
            .await;

        if let Err(e) = result {
            tracing::warn!(
                upload_id,
                error = %network_error(&e),
                "failed to abort multipart upload"
            );
        }
    }
}
