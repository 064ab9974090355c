//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from upload-core.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::types::{BucketCannedAcl, CreateBucketConfiguration, ObjectCannedAcl};

use upload_core::{
    BucketGrants, Error, ObjectAcl, ObjectStore, Result, UploadOutcome, UploadRequest,
};

use crate::multipart::{ManagedUpload, MultipartConfig};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    multipart: MultipartConfig,
}

impl S3Client {
    /// Create a new S3 client for the endpoint, region and credentials of a request
    pub async fn new(request: &UploadRequest, multipart: MultipartConfig) -> Result<Self> {
        request.endpoint_url()?;

        // Build credentials provider
        let credentials = aws_credential_types::Credentials::new(
            request.credentials.access_key.clone(),
            request.credentials.secret_key.clone(),
            None, // session token
            None, // expiry
            "s3-upload-static-credentials",
        );

        // Build SDK config
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(request.region.clone()))
            .endpoint_url(&request.endpoint)
            .load()
            .await;

        // Path-style addressing works with S3-compatible backends
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            multipart,
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Whether a HeadBucket failure means the bucket does not exist
fn is_bucket_not_found(err: &SdkError<HeadBucketError>) -> bool {
    err.raw_response()
        .is_some_and(|response| response.status().as_u16() == 404)
        || err
            .as_service_error()
            .is_some_and(HeadBucketError::is_not_found)
}

pub(crate) fn network_error<E>(err: &SdkError<E>) -> Error
where
    E: std::error::Error + 'static,
{
    Error::Network(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.inner.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) if is_bucket_not_found(&e) => Ok(false),
            Err(e) => Err(network_error(&e)),
        }
    }

    async fn create_bucket(&self, bucket: &str, grants: &BucketGrants) -> Result<String> {
        let response = self
            .inner
            .create_bucket()
            .bucket(bucket)
            .acl(BucketCannedAcl::Private)
            .create_bucket_configuration(CreateBucketConfiguration::builder().build())
            .grant_full_control(grants.full_control)
            .grant_read(grants.read)
            .grant_read_acp(grants.read_acp)
            .grant_write(grants.write)
            .grant_write_acp(grants.write_acp)
            .send()
            .await
            .map_err(|e| network_error(&e))?;

        let rendered = format!("{response:?}");
        println!("{rendered}");
        Ok(rendered)
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        acl: ObjectAcl,
        file: tokio::fs::File,
    ) -> Result<UploadOutcome> {
        ManagedUpload {
            client: &self.inner,
            config: &self.multipart,
            bucket,
            key,
            acl: ObjectCannedAcl::from(acl.as_str()),
        }
        .run(file)
        .await
    }
}
