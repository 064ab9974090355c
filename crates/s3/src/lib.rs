//! upload-s3: storage adapters for s3-upload
//!
//! This crate provides the implementations of the collaborator traits from
//! upload-core: [`S3Client`] talks to the service through aws-sdk-s3, and
//! [`AwsCli`] drives the AWS command-line tool. It is the only crate that
//! depends on the AWS SDK.

pub mod client;
pub mod multipart;
pub mod tool;

#[cfg(test)]
mod test_server;

pub use client::S3Client;
pub use multipart::MultipartConfig;
pub use tool::AwsCli;
