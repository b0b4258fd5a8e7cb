// src/display/mod.rs
//! Display side of the painter: receives committed frames and publishes them.
//!
//! - `ChannelReceiver`: the `FrameReceiver` the painter loop delivers into.
//!   Forwards frames over a bounded channel, so a slow display pushes back on
//!   the loop.
//! - `Display`: runs on its own thread, owns publish timing. Publishing means
//!   logging the frame and, when a `PngSink` is configured, writing it to disk.

pub mod png_sink;

pub use png_sink::{write_png, PngSink};

use std::path::PathBuf;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use log::*;

use crate::painter::{Frame, FrameReceiver, Framebuffer, Surface};

/// Messages from the painter loop to the display.
#[derive(Debug)]
pub enum DisplayMessage<S> {
    Frame(Frame<S>),
    RenderFailed { sequence: u64, reason: String },
}

/// `FrameReceiver` that forwards everything to a display thread.
pub struct ChannelReceiver<S> {
    tx: SyncSender<DisplayMessage<S>>,
}

impl<S: Send> FrameReceiver<S> for ChannelReceiver<S> {
    fn deliver(&mut self, frame: Frame<S>) {
        let sequence = frame.sequence;
        if self.tx.send(DisplayMessage::Frame(frame)).is_err() {
            warn!("ChannelReceiver: display closed, frame {} dropped", sequence);
        }
    }

    fn render_failed(&mut self, sequence: u64, error: &anyhow::Error) {
        let message = DisplayMessage::RenderFailed {
            sequence,
            reason: format!("{:#}", error),
        };
        if self.tx.send(message).is_err() {
            warn!("ChannelReceiver: display closed, failure of commit {} not reported", sequence);
        }
    }
}

/// Creates a receiver/display-channel pair holding at most `capacity` frames.
pub fn channel_receiver<S>(capacity: usize) -> (ChannelReceiver<S>, Receiver<DisplayMessage<S>>) {
    let (tx, rx) = sync_channel(capacity);
    (ChannelReceiver { tx }, rx)
}

/// Summary returned by the display thread when its channel closes.
#[derive(Debug, Default)]
pub struct DisplayReport {
    pub frames_published: u64,
    pub failed_commits: u64,
    pub written: Vec<PathBuf>,
    pub last_frame: Option<Frame<Framebuffer>>,
}

/// Publishes frames as they arrive.
pub struct Display {
    sink: Option<PngSink>,
    report: DisplayReport,
}

impl Display {
    pub fn new(sink: Option<PngSink>) -> Self {
        Self {
            sink,
            report: DisplayReport::default(),
        }
    }

    /// Publish one frame. The frame is kept as the latest one shown.
    pub fn publish(&mut self, frame: Frame<Framebuffer>) -> Result<()> {
        let (width, height) = frame.surface.size();
        info!(
            "Display: frame {} ({}x{}) background {:?}",
            frame.sequence,
            width,
            height,
            frame.surface.pixel(0, 0)
        );

        if let Some(sink) = &self.sink {
            let path = sink.write(frame.sequence, &frame.surface)?;
            self.report.written.push(path);
        }

        self.report.frames_published += 1;
        self.report.last_frame = Some(frame);
        Ok(())
    }

    /// Handle messages until every sender is gone.
    pub fn run(mut self, rx: Receiver<DisplayMessage<Framebuffer>>) -> DisplayReport {
        info!("Display: Thread started");

        for message in rx {
            match message {
                DisplayMessage::Frame(frame) => {
                    let sequence = frame.sequence;
                    if let Err(e) = self.publish(frame) {
                        error!("Display: failed to publish frame {}: {:#}", sequence, e);
                    }
                }
                DisplayMessage::RenderFailed { sequence, reason } => {
                    warn!("Display: commit {} produced no frame: {}", sequence, reason);
                    self.report.failed_commits += 1;
                }
            }
        }

        info!(
            "Display: Thread stopped after {} frames",
            self.report.frames_published
        );
        self.report
    }
}

/// Spawn the display thread and return the receiver to hand to the painter loop.
pub fn spawn_display_thread(
    sink: Option<PngSink>,
) -> Result<(ChannelReceiver<Framebuffer>, JoinHandle<DisplayReport>)> {
    // Capacity 1: at most one frame waits while the display is busy.
    let (receiver, rx) = channel_receiver(1);

    let handle = thread::Builder::new()
        .name("display".to_string())
        .spawn(move || Display::new(sink).run(rx))
        .context("Failed to spawn display thread")?;

    info!("spawn_display_thread: Display thread spawned");
    Ok((receiver, handle))
}
