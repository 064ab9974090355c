//! AWS command-line tool adapter
//!
//! Implements the UploadTool trait by running the `aws` program as a child
//! process. Credentials travel through the child's environment, never on its
//! command line.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use upload_core::{
    ACCESS_KEY_VAR, Credentials, Error, Result, SECRET_KEY_VAR, ToolBucket, UploadRequest,
    UploadTool,
};

/// Default program name
pub const DEFAULT_PROGRAM: &str = "aws";

/// Region variable read by the AWS CLI
const REGION_VAR: &str = "AWS_DEFAULT_REGION";

/// Variables that would make the tool authenticate differently from the SDK client
const CLEARED_VARS: &[&str] = &["AWS_SESSION_TOKEN", "AWS_PROFILE"];

/// Region where buckets are created without a location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// Client for the AWS command-line tool
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: PathBuf,
    endpoint: String,
    region: String,
    credentials: Credentials,
}

impl AwsCli {
    /// Create a client for the endpoint, region and credentials of a request
    pub fn new(program: impl Into<PathBuf>, request: &UploadRequest) -> Result<Self> {
        request.endpoint_url()?;

        Ok(Self {
            program: program.into(),
            endpoint: request.endpoint.clone(),
            region: request.region.clone(),
            credentials: request.credentials.clone(),
        })
    }

    /// Program this client runs
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &[OsString]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .arg("--endpoint-url")
            .arg(&self.endpoint)
            .env(ACCESS_KEY_VAR, &self.credentials.access_key)
            .env(SECRET_KEY_VAR, &self.credentials.secret_key)
            .env(REGION_VAR, &self.region)
            .stdin(Stdio::null());
        for name in CLEARED_VARS {
            command.env_remove(name);
        }
        command
    }

    async fn run(&self, args: Vec<OsString>) -> Result<Output> {
        tracing::debug!(program = %self.program.display(), ?args, "running upload tool");

        self.command(&args)
            .output()
            .await
            .map_err(|e| Error::Tool(format!("failed to run {}: {e}", self.program.display())))
    }

    async fn head_bucket(&self, name: &str) -> Result<bool> {
        let output = self
            .run(vec!["s3api".into(), "head-bucket".into(), "--bucket".into(), name.into()])
            .await?;

        if output.status.success() {
            return Ok(true);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_found(&stderr) {
            Ok(false)
        } else {
            Err(tool_failure("head-bucket", &output))
        }
    }

    async fn make_bucket(&self, name: &str) -> Result<()> {
        let mut args: Vec<OsString> =
            vec!["s3api".into(), "create-bucket".into(), "--bucket".into(), name.into()];
        if self.region != DEFAULT_REGION {
            args.push("--create-bucket-configuration".into());
            args.push(format!("LocationConstraint={}", self.region).into());
        }
        let output = self.run(args).await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(tool_failure("create-bucket", &output))
        }
    }
}

#[async_trait]
impl UploadTool for AwsCli {
    async fn get_or_create_bucket(&self, name: &str) -> Result<Box<dyn ToolBucket>> {
        if !self.head_bucket(name).await? {
            tracing::debug!(bucket = name, "bucket not found, creating");
            self.make_bucket(name).await?;
        }

        Ok(Box::new(AwsCliBucket {
            cli: self.clone(),
            name: name.to_string(),
        }))
    }
}

/// Bucket handle backed by the AWS CLI
#[derive(Debug, Clone)]
pub struct AwsCliBucket {
    cli: AwsCli,
    name: String,
}

#[async_trait]
impl ToolBucket for AwsCliBucket {
    async fn upload(&self, source: &Path, target: &str) -> Result<()> {
        let output = self
            .cli
            .run(vec![
                "s3".into(),
                "cp".into(),
                "--no-progress".into(),
                source.into(),
                s3_uri(&self.name, target).into(),
            ])
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(tool_failure("cp", &output))
        }
    }
}

/// Build an `s3://bucket/key` URI
fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

/// Whether tool diagnostics report a missing bucket
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("(404)") || stderr.contains("Not Found") || stderr.contains("NoSuchBucket")
}

fn tool_failure(operation: &str, output: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&output.stderr);
    Error::Tool(format!("{operation} failed ({}): {}", output.status, stderr.trim()))
}
