//! Upload flows
//!
//! The two strategies share one shape: bracket each collaborator call with
//! `starting`/`done` events and stop at the first error, which is logged
//! under the failing action and returned.

use crate::error::{Error, Result};
use crate::events::{DONE, EventSink, FOUND, LogErr, NOT_FOUND, STARTING};
use crate::request::UploadRequest;
use crate::traits::{ObjectAcl, ObjectStore, UploadOutcome, UploadTool};

pub const GET_BUCKET: &str = "get-bucket";
pub const FIND_BUCKET: &str = "find-bucket";
pub const OPEN_FILE: &str = "open-file";
pub const UPLOAD: &str = "upload";
pub const SDK_UPLOAD: &str = "sdk-upload";

/// Upload through an external tool: get or create the bucket, then upload
pub async fn cli_upload(
    tool: &dyn UploadTool,
    request: &UploadRequest,
    sink: &dyn EventSink,
) -> Result<()> {
    sink.event(GET_BUCKET, STARTING);
    let bucket = tool
        .get_or_create_bucket(&request.bucket)
        .await
        .log_err(sink, GET_BUCKET)?;
    sink.event(GET_BUCKET, DONE);

    sink.event(UPLOAD, STARTING);
    bucket
        .upload(&request.source, &request.target)
        .await
        .log_err(sink, UPLOAD)?;
    sink.event(UPLOAD, DONE);

    Ok(())
}

/// Upload through the service API: check the bucket, open the file, upload
///
/// The existence check is reported but does not change what happens next.
pub async fn sdk_upload(
    store: &dyn ObjectStore,
    request: &UploadRequest,
    sink: &dyn EventSink,
) -> Result<UploadOutcome> {
    sink.event(SDK_UPLOAD, STARTING);

    sink.event(FIND_BUCKET, STARTING);
    let found = store
        .bucket_exists(&request.bucket)
        .await
        .log_err(sink, FIND_BUCKET)?;
    sink.event(FIND_BUCKET, if found { FOUND } else { NOT_FOUND });
    sink.event(FIND_BUCKET, DONE);

    let file = tokio::fs::File::open(&request.source)
        .await
        .map_err(Error::from)
        .log_err(sink, OPEN_FILE)?;

    sink.event(UPLOAD, STARTING);
    let outcome = store
        .upload(&request.bucket, &request.target, ObjectAcl::Private, file)
        .await
        .log_err(sink, UPLOAD)?;
    tracing::debug!(
        key = %outcome.key,
        size_bytes = outcome.size_bytes,
        parts = outcome.parts,
        "upload complete"
    );
    sink.event(UPLOAD, DONE);

    sink.event(SDK_UPLOAD, DONE);
    Ok(outcome)
}
