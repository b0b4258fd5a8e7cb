//! Painter library crate.
//!
//! Command scripts are decoded into operations (`script`), fed through a
//! queue to a single painter loop that owns the canvas state (`painter`), and
//! committed frames are handed to a display (`display`).

pub mod color;
pub mod config;
pub mod display;
pub mod painter;
pub mod script;
