//! Serialized request queue.
//!
//! Every outbound logical call of one client funnels through a single FIFO
//! queue drained by one consumer task, so at most one call is consulting the
//! token bucket (or backing off) at any instant, and calls run in the order
//! they were enqueued.
//!
//! Known latency cost: a slow or retry-heavy call at the head delays every
//! call behind it. Parallelism across credentials comes from separate client
//! instances, each with its own queue.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};

use crate::error_handling::ApiError;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// FIFO queue of asynchronous operations executed one at a time.
///
/// Must be created inside a Tokio runtime: construction spawns the consumer
/// task. The consumer exits once the queue (every clone of its sender) is
/// dropped.
#[derive(Debug)]
pub struct RequestQueue {
    sender: mpsc::UnboundedSender<Job>,
    depth: Arc<AtomicUsize>,
}

impl RequestQueue {
    /// Creates an empty queue and spawns its consumer.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                    log::error!("Queued request panicked; continuing with next request");
                }
            }
            log::debug!("Request queue consumer shutting down");
        });
        RequestQueue {
            sender,
            depth: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Appends an operation to the queue.
    ///
    /// The operation is placed in the queue when this method is called, not
    /// when the returned future is first polled, so enqueue order is call
    /// order. The returned future resolves with the operation's output once
    /// every earlier operation has settled and this one has run.
    ///
    /// If the returned future is dropped before the operation reaches the
    /// head of the queue, the operation is skipped. Once started, an
    /// operation always runs to completion.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ClientShutdown` if the consumer is gone or the
    /// operation panicked.
    pub fn enqueue<F, T>(&self, operation: F) -> impl Future<Output = Result<T, ApiError>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.depth.fetch_add(1, Ordering::SeqCst);
        let guard = DepthGuard(Arc::clone(&self.depth));

        let job: Job = Box::pin(async move {
            let _guard = guard;
            if tx.is_closed() {
                log::debug!("Skipping queued request: caller no longer waiting");
                return;
            }
            let output = operation.await;
            // The caller may have gone away while we ran; nothing to do then.
            let _ = tx.send(output);
        });

        if self.sender.send(job).is_err() {
            log::error!("Request queue consumer is not running");
        }

        async move { rx.await.map_err(|_| ApiError::ClientShutdown) }
    }

    /// Number of operations waiting or running.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

struct DepthGuard(Arc<AtomicUsize>);

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
