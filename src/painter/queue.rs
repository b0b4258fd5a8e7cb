// src/painter/queue.rs

//! Operation queue between any number of producers and the painter loop.
//!
//! Backed by `std::sync::mpsc::sync_channel`:
//! - **Unbuffered**: capacity 0, every `submit` is a rendezvous with the loop.
//! - **Bounded(n)**: `submit` blocks only once `n` operations are waiting.
//!
//! Operations from one producer arrive in the order their `submit` calls
//! returned. Closing the queue makes new submits fail immediately, and any
//! submit blocked on a full queue unblocks with `QueueClosed` once the loop
//! drops its receiver.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;

use log::{debug, trace};

use crate::painter::operation::Operation;

/// How many operations may wait in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCapacity {
    Unbuffered,
    Bounded(usize),
}

impl QueueCapacity {
    fn slots(self) -> usize {
        match self {
            QueueCapacity::Unbuffered => 0,
            QueueCapacity::Bounded(n) => n,
        }
    }
}

impl From<usize> for QueueCapacity {
    fn from(capacity: usize) -> Self {
        if capacity == 0 {
            QueueCapacity::Unbuffered
        } else {
            QueueCapacity::Bounded(capacity)
        }
    }
}

/// Returned when submitting to a queue whose painter loop has shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueClosed;

impl fmt::Display for QueueClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "painter queue is closed")
    }
}

impl std::error::Error for QueueClosed {}

impl<T> From<mpsc::SendError<T>> for QueueClosed {
    fn from(_: mpsc::SendError<T>) -> Self {
        QueueClosed
    }
}

/// What travels through the channel. `Wake` carries nothing and only gets a
/// blocked receiver to look at the closed flag.
enum Envelope {
    Op(Operation),
    Wake,
}

/// Producer handle. Clone it freely; every clone feeds the same loop.
#[derive(Clone)]
pub struct OpSender {
    tx: SyncSender<Envelope>,
    closed: Arc<AtomicBool>,
}

impl OpSender {
    /// Hands one operation to the loop, blocking as the capacity dictates.
    pub fn submit(&self, op: Operation) -> Result<(), QueueClosed> {
        if self.is_closed() {
            return Err(QueueClosed);
        }
        trace!("OpSender: submitting {}", op.name());
        self.tx.send(Envelope::Op(op))?;
        Ok(())
    }

    /// Submits operations in order, stopping at the first failure.
    /// Returns how many were submitted.
    pub fn submit_all<I>(&self, ops: I) -> Result<usize, QueueClosed>
    where
        I: IntoIterator<Item = Operation>,
    {
        let mut submitted = 0;
        for op in ops {
            self.submit(op)?;
            submitted += 1;
        }
        Ok(submitted)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Marks the queue closed and wakes the receiver so it notices.
    pub(crate) fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        debug!("OpSender: closing queue");
        // Fails once the receiver is gone, which is the outcome we want anyway.
        let _ = self.tx.send(Envelope::Wake);
    }
}

/// Consumer handle, held only by the painter loop.
pub struct OpReceiver {
    rx: Receiver<Envelope>,
    closed: Arc<AtomicBool>,
}

impl OpReceiver {
    /// Blocks until the next operation arrives. Returns `None` once the queue
    /// is closed or every sender is gone; anything still queued is discarded.
    pub fn next(&self) -> Option<Operation> {
        loop {
            let envelope = self.rx.recv().ok()?;
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            match envelope {
                Envelope::Op(op) => return Some(op),
                Envelope::Wake => continue,
            }
        }
    }
}

/// Creates a connected sender/receiver pair.
pub fn channel(capacity: QueueCapacity) -> (OpSender, OpReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity.slots());
    let closed = Arc::new(AtomicBool::new(false));
    (
        OpSender {
            tx,
            closed: Arc::clone(&closed),
        },
        OpReceiver { rx, closed },
    )
}
