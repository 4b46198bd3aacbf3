//! Progress-tracking stream wrapper for upload bodies.

use bytes::Bytes;
use futures_util::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::time::{Duration, Instant};

/// Callback for progress updates, called with the running byte count
pub type ProgressCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Stream wrapper that counts bytes passing through and reports them
/// at most every `update_interval`, plus once at the end.
pub struct ProgressStream<S> {
    inner: S,
    bytes_transferred: u64,
    last_update: Instant,
    update_interval: Duration,
    callback: ProgressCallback,
}

impl<S> ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, std::io::Error>>,
{
    pub fn new(inner: S, callback: ProgressCallback) -> Self {
        Self {
            inner,
            bytes_transferred: 0,
            last_update: Instant::now(),
            update_interval: Duration::from_millis(500),
            callback,
        }
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }
}

impl<S> Stream for ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, std::io::Error>> + Unpin,
{
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let inner = Pin::new(&mut self.inner);

        match inner.poll_next(cx) {
            Poll::Ready(Some(Ok(bytes))) => {
                self.bytes_transferred += bytes.len() as u64;

                let now = Instant::now();
                if now.duration_since(self.last_update) >= self.update_interval {
                    (self.callback)(self.bytes_transferred);
                    self.last_update = now;
                }

                Poll::Ready(Some(Ok(bytes)))
            }
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => {
                (self.callback)(self.bytes_transferred);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
