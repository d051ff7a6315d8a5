//! Stream combinators used by the use cases.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream, Stream, StreamExt};

/// One event of a materialized stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent<T, E> {
    Next(T),
    Error(E),
    Completed,
}

impl<T, E> StreamEvent<T, E> {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Next(_))
    }
}

/// Turn a fallible stream into a stream of events that always ends with
/// exactly one `Error` or `Completed`.
pub fn materialize<T, E>(
    inner: BoxStream<'static, Result<T, E>>,
) -> BoxStream<'static, StreamEvent<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    stream::unfold(Some(inner), |state| async move {
        let mut inner = state?;
        match inner.next().await {
            Some(Ok(value)) => Some((StreamEvent::Next(value), Some(inner))),
            Some(Err(e)) => Some((StreamEvent::Error(e), None)),
            None => Some((StreamEvent::Completed, None)),
        }
    })
    .boxed()
}

/// Pair items from two fallible streams.
///
/// Both sides are polled together. The result ends as soon as either side
/// ends, and fails as soon as either side fails; the other side is not polled
/// again.
pub fn zip2<A, B, E>(
    left: BoxStream<'static, Result<A, E>>,
    right: BoxStream<'static, Result<B, E>>,
) -> BoxStream<'static, Result<(A, B), E>>
where
    A: Send + Unpin + 'static,
    B: Send + Unpin + 'static,
    E: Send + 'static,
{
    Zip2 {
        left,
        right,
        left_item: None,
        right_item: None,
        done: false,
    }
    .boxed()
}

struct Zip2<A, B, E> {
    left: BoxStream<'static, Result<A, E>>,
    right: BoxStream<'static, Result<B, E>>,
    left_item: Option<A>,
    right_item: Option<B>,
    done: bool,
}

impl<A: Unpin, B: Unpin, E> Stream for Zip2<A, B, E> {
    type Item = Result<(A, B), E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        if this.left_item.is_none() {
            match this.left.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(value))) => this.left_item = Some(value),
                Poll::Ready(Some(Err(e))) => return this.finish(Some(Err(e))),
                Poll::Ready(None) => return this.finish(None),
                Poll::Pending => {}
            }
        }

        if this.right_item.is_none() {
            match this.right.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(value))) => this.right_item = Some(value),
                Poll::Ready(Some(Err(e))) => return this.finish(Some(Err(e))),
                Poll::Ready(None) => return this.finish(None),
                Poll::Pending => {}
            }
        }

        match (this.left_item.take(), this.right_item.take()) {
            (Some(a), Some(b)) => Poll::Ready(Some(Ok((a, b)))),
            (a, b) => {
                this.left_item = a;
                this.right_item = b;
                Poll::Pending
            }
        }
    }
}

impl<A, B, E> Zip2<A, B, E> {
    fn finish(&mut self, last: Option<Result<(A, B), E>>) -> Poll<Option<Result<(A, B), E>>> {
        self.done = true;
        self.left_item = None;
        self.right_item = None;
        Poll::Ready(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    fn ok<T: Send + 'static>(items: Vec<T>) -> BoxStream<'static, Result<T, String>> {
        stream::iter(items.into_iter().map(Ok)).boxed()
    }

    #[tokio::test]
    async fn test_zip_pairs_in_order() {
        let zipped: Vec<_> = zip2(ok(vec![1, 2, 3]), ok(vec!["a", "b", "c"]))
            .collect()
            .await;

        assert_eq!(zipped, vec![Ok((1, "a")), Ok((2, "b")), Ok((3, "c"))]);
    }

    #[test]
    fn test_zip_waits_for_both_sides() {
        let (tx, rx) = futures::channel::oneshot::channel::<Result<u8, String>>();
        let right = stream::once(async move { rx.await.unwrap() }).boxed();
        let mut zipped = task::spawn(zip2(ok(vec!["a"]), right));

        assert_pending!(zipped.poll_next());

        tx.send(Ok(7)).unwrap();
        assert!(zipped.is_woken());
        assert_ready_eq!(zipped.poll_next(), Some(Ok(("a", 7))));
    }

    #[tokio::test]
    async fn test_zip_ends_with_shorter_side() {
        let zipped: Vec<_> = zip2(ok(vec![1, 2, 3]), ok(vec!["a"])).collect().await;
        assert_eq!(zipped, vec![Ok((1, "a"))]);

        let empty: Vec<_> = zip2(ok(Vec::<u8>::new()), ok(vec!["a"])).collect().await;
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_zip_fails_without_waiting_for_other_side() {
        let slow = stream::once(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<u8, String>(1)
        })
        .boxed();
        let failing = stream::iter(vec![Err::<u8, String>("boom".to_string())]).boxed();

        let zipped = tokio::time::timeout(
            Duration::from_secs(5),
            zip2(slow, failing).collect::<Vec<_>>(),
        )
        .await
        .unwrap();

        assert_eq!(zipped, vec![Err("boom".to_string())]);
    }

    #[tokio::test]
    async fn test_materialize_success() {
        let events: Vec<_> = materialize(ok(vec![1, 2])).collect().await;

        assert_eq!(
            events,
            vec![
                StreamEvent::Next(1),
                StreamEvent::Next(2),
                StreamEvent::Completed
            ]
        );
    }

    #[tokio::test]
    async fn test_materialize_stops_at_first_error() {
        let source = stream::iter(vec![Ok(1), Err("bad".to_string()), Ok(2)]).boxed();

        let events: Vec<_> = materialize(source).collect().await;

        assert_eq!(
            events,
            vec![StreamEvent::Next(1), StreamEvent::Error("bad".to_string())]
        );
        assert!(events[1].is_terminal());
    }
}
