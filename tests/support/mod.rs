//! Shared fixtures for painter integration tests.

#![allow(dead_code)]

use painter::config::Config;
use painter::painter::{Frame, FrameReceiver, Framebuffer, Operation, OperationObserver};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// 100x100 frames with figures small enough to stay readable.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.surface.width = 100;
    config.surface.height = 100;
    config.figure.scale = 0.1;
    config
}

/// Receiver that keeps every frame it is given.
#[derive(Clone, Default)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<Frame<Framebuffer>>>>,
    failures: Arc<Mutex<Vec<u64>>>,
}

impl FrameLog {
    pub fn len(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn take(&self) -> Vec<Frame<Framebuffer>> {
        std::mem::take(&mut *self.frames.lock().unwrap())
    }

    pub fn failures(&self) -> Vec<u64> {
        self.failures.lock().unwrap().clone()
    }
}

impl FrameReceiver<Framebuffer> for FrameLog {
    fn deliver(&mut self, frame: Frame<Framebuffer>) {
        self.frames.lock().unwrap().push(frame);
    }

    fn render_failed(&mut self, sequence: u64, _error: &anyhow::Error) {
        self.failures.lock().unwrap().push(sequence);
    }
}

/// Observer that reports the running processed count to a `Completion`.
pub struct CompletionObserver {
    tx: Sender<u64>,
}

impl OperationObserver for CompletionObserver {
    fn operation_processed(&mut self, _op: &Operation, processed: u64) {
        let _ = self.tx.send(processed);
    }
}

/// Waits until the painter loop has fully applied a number of operations.
pub struct Completion {
    rx: Receiver<u64>,
    seen: u64,
}

impl Completion {
    /// Blocks until at least `count` operations have been processed.
    pub fn wait_for(&mut self, count: u64) {
        while self.seen < count {
            match self.rx.recv_timeout(WAIT_TIMEOUT) {
                Ok(processed) => self.seen = processed,
                Err(_) => panic!("only {} of {} operations processed", self.seen, count),
            }
        }
    }
}

pub fn completion() -> (CompletionObserver, Completion) {
    let (tx, rx) = mpsc::channel();
    (CompletionObserver { tx }, Completion { rx, seen: 0 })
}
