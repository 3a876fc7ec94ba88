//! Byte relay from the upstream exchange to the caller.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use uuid::Uuid;

use crate::observability::metrics;

/// Bookkeeping carried across chunks of one relayed stream.
struct RelayProgress<S> {
    body: S,
    request_id: Uuid,
    chunks: u64,
    bytes: u64,
    failed: bool,
}

/// Adapt the upstream body into the caller-facing byte stream.
///
/// Chunks pass through unmodified and in arrival order; the adapter only
/// observes, counting traffic and logging whether the stream ended cleanly
/// or was cut mid-generation. A transport error after streaming has begun
/// terminates the body (the caller sees a truncated stream); it is never a
/// retry trigger. Dropping the returned stream drops the upstream response
/// with it, aborting the exchange when the caller goes away.
pub fn relay_stream(
    upstream: reqwest::Response,
    request_id: Uuid,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
    let progress = RelayProgress {
        body: upstream.bytes_stream(),
        request_id,
        chunks: 0,
        bytes: 0,
        failed: false,
    };

    futures_util::stream::unfold(progress, |mut progress| async move {
        if progress.failed {
            return None;
        }

        match progress.body.next().await {
            Some(Ok(chunk)) => {
                progress.chunks += 1;
                progress.bytes += chunk.len() as u64;
                Some((Ok(chunk), progress))
            }
            Some(Err(e)) => {
                progress.failed = true;
                tracing::warn!(
                    request_id = %progress.request_id,
                    chunks = progress.chunks,
                    bytes = progress.bytes,
                    error = %e,
                    "Upstream stream truncated"
                );
                metrics::record_stream_end(progress.bytes, true);
                Some((Err(std::io::Error::other(e)), progress))
            }
            None => {
                tracing::debug!(
                    request_id = %progress.request_id,
                    chunks = progress.chunks,
                    bytes = progress.bytes,
                    "Upstream stream complete"
                );
                metrics::record_stream_end(progress.bytes, false);
                None
            }
        }
    })
}
