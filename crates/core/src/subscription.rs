//! Subscribe-with-cancel handle for consuming repository streams.
//!
//! [`subscribe`] drives a stream on a background task and forwards each item
//! to a channel. Cancelling (or dropping) the [`Subscription`] stops the task
//! and drops the stream, which aborts whatever fetch it had in flight.

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Items buffered between the forwarding task and the receiver.
const SUBSCRIPTION_BUFFER: usize = 16;

/// Handle on a running subscription.
#[derive(Debug)]
pub struct Subscription {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stop forwarding and drop the stream. No further items are delivered.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the forwarding task to finish, either because the stream
    /// completed or because the subscription was cancelled.
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Subscription task failed");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}

/// Start driving `stream` and return its handle and item receiver.
///
/// Must be called from within a tokio runtime. The receiver closes once the
/// stream completes or the subscription is cancelled; dropping the receiver
/// also stops the task.
pub fn subscribe<S>(stream: S) -> (Subscription, mpsc::Receiver<S::Item>)
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let handle = tokio::spawn(async move {
        let mut stream = Box::pin(stream);
        loop {
            let item = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                item = stream.next() => item,
            };
            let Some(item) = item else {
                break;
            };
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                sent = tx.send(item) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
        debug!(cancelled = token.is_cancelled(), "Subscription finished");
    });

    (
        Subscription {
            cancel,
            handle: Some(handle),
        },
        rx,
    )
}
