// src/painter/mod.rs

//! The painter core: operations, the canvas state they mutate, the queue that
//! feeds them to a single worker, and the loop that renders committed frames.

pub mod engine;
pub mod figure;
pub mod operation;
pub mod queue;
pub mod state;
pub mod surface;

pub use engine::{
    Frame, FrameReceiver, LoopReport, NoOpObserver, OperationObserver, PainterHandle, PainterLoop,
};
pub use operation::{Operation, Point, Rect, RenderStyle};
pub use queue::{OpReceiver, OpSender, QueueCapacity, QueueClosed};
pub use state::CanvasState;
pub use surface::{Framebuffer, FramebufferFactory, PixelRect, Surface, SurfaceFactory};
