//! Upload strategies
//!
//! Each [`UploadMethod`] maps to one strategy holding the collaborator it
//! drives; all strategies run through the same `execute` call.

use std::path::PathBuf;

use upload_core::{EventSink, Result, UploadMethod, UploadRequest, cli_upload, sdk_upload};
use upload_s3::{AwsCli, MultipartConfig, S3Client};

/// Settings the strategies need beyond the upload request
#[derive(Debug, Clone)]
pub struct StrategyOptions {
    /// Program run by the cli strategy
    pub aws_cli: PathBuf,

    /// Managed upload settings for the sdk strategy
    pub multipart: MultipartConfig,
}

/// A ready-to-run upload strategy
pub enum Strategy {
    /// External AWS command-line tool
    Cli(AwsCli),
    /// AWS SDK with a managed upload
    Sdk(S3Client),
}

impl Strategy {
    /// Build the collaborator for the request's method
    pub async fn build(request: &UploadRequest, options: &StrategyOptions) -> Result<Self> {
        match request.method {
            UploadMethod::Cli => Ok(Self::Cli(AwsCli::new(&options.aws_cli, request)?)),
            UploadMethod::Sdk => Ok(Self::Sdk(
                S3Client::new(request, options.multipart.clone()).await?,
            )),
        }
    }

    pub fn method(&self) -> UploadMethod {
        match self {
            Self::Cli(_) => UploadMethod::Cli,
            Self::Sdk(_) => UploadMethod::Sdk,
        }
    }

    /// Run the upload
    pub async fn execute(&self, request: &UploadRequest, sink: &dyn EventSink) -> Result<()> {
        match self {
            Self::Cli(tool) => cli_upload(tool, request, sink).await,
            Self::Sdk(store) => sdk_upload(store, request, sink).await.map(|_| ()),
        }
    }
}
