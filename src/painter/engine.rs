// src/painter/engine.rs
//! PainterLoop - Dedicated thread that owns the canvas state.
//!
//! Work queue pattern: receives operations from `OpReceiver`, applies each to
//! the `CanvasState`, and on `Commit` renders the state onto a freshly
//! allocated surface that is handed to a `FrameReceiver`.
//!
//! Threading model:
//! - Owns: CanvasState, SurfaceFactory, FrameReceiver, observer
//! - Producers only ever touch the queue, never the state
//! - One operation at a time, so renders never overlap
//!
//! Per operation the loop goes Idle -> Applying -> (Rendering, commits only)
//! -> Idle. It runs until the queue is closed.

use anyhow::{Context, Result};
use log::*;
use std::thread::{self, JoinHandle};

use crate::config::Config;
use crate::painter::operation::{Operation, RenderStyle};
use crate::painter::queue::{self, OpReceiver, OpSender, QueueCapacity, QueueClosed};
use crate::painter::state::CanvasState;
use crate::painter::surface::SurfaceFactory;

/// A rendered surface together with its commit sequence number.
#[derive(Debug)]
pub struct Frame<S> {
    /// Counts every commit, including ones whose render failed.
    pub sequence: u64,
    pub surface: S,
}

/// Consumer of committed frames. Owns display timing; the loop never looks at
/// a surface again after delivering it.
pub trait FrameReceiver<S>: Send {
    fn deliver(&mut self, frame: Frame<S>);

    /// Called instead of `deliver` when a commit could not be rendered.
    fn render_failed(&mut self, _sequence: u64, _error: &anyhow::Error) {}
}

/// Hook invoked after every fully processed operation.
///
/// `processed` is the running count including `op`. Used to flush
/// deterministically in tests; production code can leave it unset.
pub trait OperationObserver: Send {
    fn operation_processed(&mut self, op: &Operation, processed: u64);
}

/// Default observer: does nothing.
pub struct NoOpObserver;

impl OperationObserver for NoOpObserver {
    fn operation_processed(&mut self, _op: &Operation, _processed: u64) {}
}

impl<F> OperationObserver for F
where
    F: FnMut(&Operation, u64) + Send,
{
    fn operation_processed(&mut self, op: &Operation, processed: u64) {
        self(op, processed)
    }
}

/// What the loop hands back when it stops.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopReport {
    pub state: CanvasState,
    pub processed: u64,
    pub frames_delivered: u64,
    pub failed_commits: u64,
}

/// Painter loop state (runs on a dedicated thread once spawned).
pub struct PainterLoop<F, R> {
    state: CanvasState,
    factory: F,
    receiver: R,
    observer: Box<dyn OperationObserver>,
    style: RenderStyle,
    frame_width: u32,
    frame_height: u32,
    capacity: QueueCapacity,
    processed: u64,
    commits: u64,
    frames_delivered: u64,
    failed_commits: u64,
}

impl<F, R> PainterLoop<F, R>
where
    F: SurfaceFactory + 'static,
    R: FrameReceiver<F::Surface> + 'static,
{
    /// Create a loop from configuration, a surface factory and a receiver.
    pub fn new(config: &Config, factory: F, receiver: R) -> Self {
        Self {
            state: CanvasState::new(config.canvas.initial_background),
            factory,
            receiver,
            observer: Box::new(NoOpObserver),
            style: RenderStyle::from_config(config),
            frame_width: config.surface.width,
            frame_height: config.surface.height,
            capacity: config.queue.capacity(),
            processed: 0,
            commits: 0,
            frames_delivered: 0,
            failed_commits: 0,
        }
    }

    /// Install a hook that runs after each processed operation.
    pub fn with_observer(mut self, observer: impl OperationObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Override the queue capacity taken from the configuration.
    pub fn with_capacity(mut self, capacity: QueueCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Spawn the loop thread and return the handle producers submit through.
    pub fn spawn(self) -> Result<PainterHandle> {
        let (sender, ops) = queue::channel(self.capacity);
        info!("PainterLoop: spawning with {:?} queue", self.capacity);

        let thread = thread::Builder::new()
            .name("painter".to_string())
            .spawn(move || self.run(ops))
            .context("Failed to spawn painter thread")?;

        Ok(PainterHandle {
            sender: Some(sender),
            thread: Some(thread),
        })
    }

    /// Run the loop on the current thread until the queue closes.
    pub fn run(mut self, ops: OpReceiver) -> LoopReport {
        info!("PainterLoop: started");

        while let Some(op) = ops.next() {
            self.process(op);
        }

        info!(
            "PainterLoop: stopped after {} operations, {} frames delivered, {} failed commits",
            self.processed, self.frames_delivered, self.failed_commits
        );

        LoopReport {
            state: self.state,
            processed: self.processed,
            frames_delivered: self.frames_delivered,
            failed_commits: self.failed_commits,
        }
    }

    fn process(&mut self, op: Operation) {
        debug!("PainterLoop: applying {}", op.name());
        op.apply(&mut self.state);

        if op.is_commit() {
            self.commit();
        }

        self.processed += 1;
        self.observer.operation_processed(&op, self.processed);
    }

    fn commit(&mut self) {
        let sequence = self.commits;
        self.commits += 1;

        match self.render() {
            Ok(surface) => {
                trace!("PainterLoop: delivering frame {}", sequence);
                self.receiver.deliver(Frame { sequence, surface });
                self.frames_delivered += 1;
            }
            Err(e) => {
                error!("PainterLoop: commit {} not rendered: {:#}", sequence, e);
                self.failed_commits += 1;
                self.receiver.render_failed(sequence, &e);
            }
        }
    }

    /// Draw the current state onto a new surface.
    fn render(&mut self) -> Result<F::Surface> {
        let mut surface = self
            .factory
            .new_surface(self.frame_width, self.frame_height)
            .context("Failed to allocate frame surface")?;

        for op in self.state.draw_list() {
            op.draw(&mut surface, &self.style);
        }

        Ok(surface)
    }
}

/// Host-side handle to a running painter loop.
///
/// Dropping the handle shuts the loop down and waits for its thread.
pub struct PainterHandle {
    sender: Option<OpSender>,
    thread: Option<JoinHandle<LoopReport>>,
}

impl PainterHandle {
    /// A producer handle that can be moved to other threads.
    pub fn sender(&self) -> Result<OpSender, QueueClosed> {
        self.sender.clone().ok_or(QueueClosed)
    }

    /// Submit operations in order from the calling thread.
    pub fn submit<I>(&self, ops: I) -> Result<usize, QueueClosed>
    where
        I: IntoIterator<Item = Operation>,
    {
        self.sender()?.submit_all(ops)
    }

    /// Stop accepting work from this handle and wait until every other sender
    /// is dropped and the queue is drained.
    pub fn finish(mut self) -> Result<LoopReport> {
        debug!("PainterHandle: finishing, waiting for producers to drain");
        self.sender = None;
        self.join()
    }

    /// Stop the loop and wait for it. Operations still queued are dropped and
    /// blocked producers get `QueueClosed`.
    pub fn shutdown(mut self) -> Result<LoopReport> {
        self.close();
        self.join()
    }

    fn close(&mut self) {
        if let Some(sender) = self.sender.take() {
            sender.close();
        }
    }

    fn join(&mut self) -> Result<LoopReport> {
        let thread = self
            .thread
            .take()
            .context("Painter thread already joined")?;
        thread
            .join()
            .map_err(|_| anyhow::anyhow!("Painter thread panicked"))
    }
}

impl Drop for PainterHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.close();
            if let Err(e) = self.join() {
                warn!("PainterHandle: {:#}", e);
            }
        }
    }
}
