//! CLI flag definitions and execution
//!
//! Flags are parsed into [`Cli`], checked, combined with the credentials from
//! the environment into an upload request, and handed to the selected
//! upload strategy.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing::Instrument;
use upload_core::{
    Credentials, Error, EventSink, Result, TracingSink, UploadMethod, UploadRequest,
};
use upload_s3::MultipartConfig;

use crate::exit_code::ExitCode;

pub mod upload;

use upload::{Strategy, StrategyOptions};

/// Action name for credential resolution failures
const GETENV: &str = "getenv";

/// Action name for method selection failures
const METHOD: &str = "method";

/// Action name for client construction failures
const CONNECT: &str = "connect";

/// Long flags that may also be spelled with a single dash
const LONG_FLAGS: &[&str] = &[
    "method", "source", "target", "bucket", "endpoint", "region", "aws-cli", "part-size", "json",
    "help", "version",
];

/// s3-upload - upload one file to S3-compatible object storage
///
/// Credentials are read from AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY.
#[derive(Parser, Debug)]
#[command(name = "s3-upload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Upload method: cli or sdk
    #[arg(long, default_value = "cli")]
    pub method: String,

    /// Source path
    #[arg(long, default_value = "")]
    pub source: String,

    /// Target path (object key)
    #[arg(long, default_value = "")]
    pub target: String,

    /// Bucket name
    #[arg(long, default_value = "")]
    pub bucket: String,

    /// S3 endpoint URL
    #[arg(long, default_value = "")]
    pub endpoint: String,

    /// S3 region
    #[arg(long, default_value = "")]
    pub region: String,

    /// AWS command-line tool used by the cli method
    #[arg(long, env = "S3_UPLOAD_AWS_CLI", default_value = upload_s3::tool::DEFAULT_PROGRAM)]
    pub aws_cli: PathBuf,

    /// Part size in bytes for multipart uploads with the sdk method
    #[arg(long, env = "S3_UPLOAD_PART_SIZE")]
    pub part_size: Option<u64>,

    /// Write log lines as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl Cli {
    /// Fail with a usage error naming every required flag left empty
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_flags();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Usage(format!(
                "missing required flags: {}",
                missing.join(", ")
            )))
        }
    }

    /// Names of required flags left empty
    pub fn missing_flags(&self) -> Vec<&'static str> {
        [
            ("--source", &self.source),
            ("--target", &self.target),
            ("--bucket", &self.bucket),
            ("--endpoint", &self.endpoint),
            ("--region", &self.region),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(flag, _)| flag)
        .collect()
    }

    /// Build the upload request once credentials and method are known
    pub fn to_request(&self, credentials: Credentials, method: UploadMethod) -> UploadRequest {
        UploadRequest {
            source: PathBuf::from(&self.source),
            target: self.target.clone(),
            bucket: self.bucket.clone(),
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            credentials,
            method,
        }
    }

    fn strategy_options(&self) -> StrategyOptions {
        let mut multipart = MultipartConfig::new();
        if let Some(size) = self.part_size {
            multipart = multipart.part_size(size);
        }
        StrategyOptions {
            aws_cli: self.aws_cli.clone(),
            multipart,
        }
    }
}

/// Rewrite single-dash long flags (`-source x`, `-method=sdk`) to `--` form
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if !rest.starts_with('-') && LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}

/// Execute the upload and return an exit code
///
/// This is the single place where an error turns into process failure.
/// Upload errors were already logged under their action, so they are only
/// printed here; usage errors go to stderr with the help text.
pub async fn execute(cli: Cli) -> ExitCode {
    let result = match cli.validate() {
        Ok(()) => run(&cli, &TracingSink, |name| std::env::var(name).ok()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            report(&e);
            ExitCode::from_error(&e)
        }
    }
}

fn report(err: &Error) {
    if let Error::Usage(_) = err {
        eprintln!("{err}\n");
        eprintln!("{}", Cli::command().render_help());
    } else {
        println!("{err}");
    }
}

/// Resolve credentials, select the strategy and run it
pub async fn run<F>(cli: &Cli, sink: &dyn EventSink, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = Credentials::from_lookup(lookup).inspect_err(|e| sink.error(GETENV, e))?;
    let method = cli
        .method
        .parse::<UploadMethod>()
        .inspect_err(|e| sink.error(METHOD, e))?;

    let request = cli.to_request(credentials, method);
    let span = tracing::info_span!("s3-upload", method = %request.method, bucket = %request.bucket);

    dispatch(cli, &request, sink).instrument(span).await
}

async fn dispatch(cli: &Cli, request: &UploadRequest, sink: &dyn EventSink) -> Result<()> {
    let strategy = Strategy::build(request, &cli.strategy_options())
        .await
        .inspect_err(|e| sink.error(CONNECT, e))?;
    tracing::debug!(method = %strategy.method(), "upload strategy ready");
    strategy.execute(request, sink).await
}
