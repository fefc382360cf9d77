//! Bounded multi-producer/multi-consumer queue.
//!
//! A `tokio::sync::mpsc` channel whose receiver is shared behind an async
//! mutex, so any number of workers can pull from it. The queue closes once
//! every [`QueueSender`] is dropped and the buffer is drained.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use super::stop::StopSignal;

/// Why an item could not be enqueued. The item is handed back.
#[derive(Debug, PartialEq, Eq)]
pub enum SendError<T> {
    /// Every receiver is gone.
    Closed(T),
    /// The stop signal fired while waiting for capacity.
    Stopped(T),
}

impl<T> SendError<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Closed(item) | Self::Stopped(item) => item,
        }
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(_) => f.write_str("queue closed"),
            Self::Stopped(_) => f.write_str("stopped while waiting for queue capacity"),
        }
    }
}

/// Create a bounded queue. A zero capacity is raised to one.
#[must_use]
pub fn bounded<T>(capacity: usize) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        QueueSender { tx },
        QueueReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Cloneable sending half.
#[derive(Debug)]
pub struct QueueSender<T> {
    tx: mpsc::Sender<T>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> QueueSender<T> {
    /// Enqueue, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Stopped`] if `stop` fires first, or
    /// [`SendError::Closed`] if no receiver remains.
    pub async fn send(&self, item: T, stop: &StopSignal) -> Result<(), SendError<T>> {
        if stop.is_stopped() {
            return Err(SendError::Stopped(item));
        }
        let permit = tokio::select! {
            biased;
            () = stop.cancelled() => return Err(SendError::Stopped(item)),
            permit = self.tx.reserve() => permit,
        };
        match permit {
            Ok(permit) => {
                permit.send(item);
                Ok(())
            }
            Err(_) => Err(SendError::Closed(item)),
        }
    }

    /// Items currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

/// Cloneable receiving half shared by a worker pool.
#[derive(Debug)]
pub struct QueueReceiver<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> QueueReceiver<T> {
    /// Next item, or `None` once the queue is closed and drained.
    ///
    /// Cancel-safe: dropping the future never loses an item.
    pub async fn recv(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}
