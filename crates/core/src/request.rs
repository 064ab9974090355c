//! Upload request and credential resolution
//!
//! An [`UploadRequest`] is built once from parsed flags and the resolved
//! credentials, and is read-only afterwards.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the access key
pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable holding the secret key
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Static credentials for the storage service
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Resolve credentials through an arbitrary variable lookup
    ///
    /// The access key is checked first; an unset or empty variable fails
    /// immediately, so only the first missing one is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key = required(&lookup, ACCESS_KEY_VAR)?;
        let secret_key = required(&lookup, SECRET_KEY_VAR)?;
        Ok(Self {
            access_key,
            secret_key,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingEnv(name)),
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Upload strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMethod {
    /// Drive the external AWS command-line tool
    #[default]
    Cli,
    /// Call the storage service API directly
    Sdk,
}

impl UploadMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Sdk => "sdk",
        }
    }
}

impl FromStr for UploadMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cli" => Ok(Self::Cli),
            "sdk" => Ok(Self::Sdk),
            other => Err(Error::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for UploadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one invocation needs to perform its upload
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Local file to upload
    pub source: PathBuf,

    /// Destination object key
    pub target: String,

    /// Destination bucket
    pub bucket: String,

    /// Storage service endpoint URL
    pub endpoint: String,

    /// Storage service region
    pub region: String,

    /// Static credentials
    pub credentials: Credentials,

    /// Selected upload strategy
    pub method: UploadMethod,
}

impl UploadRequest {
    /// Parse the endpoint as a URL
    pub fn endpoint_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.endpoint)?)
    }
}
