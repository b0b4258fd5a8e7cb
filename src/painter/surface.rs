// src/painter/surface.rs

//! Raster surfaces and the factory the painter loop allocates them from.
//!
//! `Surface` is the minimal drawing interface the loop needs: a pixel size and
//! a rectangle fill. `Framebuffer` is the in-memory implementation, an RGBA
//! byte buffer in the same layout display drivers consume.

use anyhow::{bail, Result};
use log::{debug, trace};

use crate::color::Color;

const BYTES_PER_PIXEL: usize = 4;

/// A half-open pixel rectangle `[x0, x1) x [y0, y1)`.
///
/// Coordinates may lie outside a surface; fills clip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Intersection with `[0, width) x [0, height)`.
    pub fn clip(&self, width: u32, height: u32) -> PixelRect {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        PixelRect {
            x0: self.x0.clamp(0, w),
            y0: self.y0.clamp(0, h),
            x1: self.x1.clamp(0, w),
            y1: self.y1.clamp(0, h),
        }
    }
}

/// A raster target the painter draws a frame onto.
pub trait Surface {
    /// Pixel dimensions as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Paints `area` (clipped to the surface) with `color`.
    fn fill(&mut self, area: PixelRect, color: Color);

    /// The whole surface as a rectangle.
    fn bounds(&self) -> PixelRect {
        let (width, height) = self.size();
        PixelRect::new(0, 0, width as i32, height as i32)
    }
}

/// Allocates a fresh surface for every committed frame.
pub trait SurfaceFactory: Send {
    type Surface: Surface + Send + 'static;

    fn new_surface(&mut self, width: u32, height: u32) -> Result<Self::Surface>;
}

/// RGBA pixels, row-major, 4 bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Box<[u8]>,
}

impl Framebuffer {
    /// Creates a fully transparent framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            pixels: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Colour of the pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x as usize, y as usize);
        let mut bytes = [0u8; BYTES_PER_PIXEL];
        bytes.copy_from_slice(&self.pixels[offset..offset + BYTES_PER_PIXEL]);
        Some(Color::from_bytes(bytes))
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * BYTES_PER_PIXEL
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, area: PixelRect, color: Color) {
        let area = area.clip(self.width, self.height);
        if area.is_empty() {
            trace!("Framebuffer: skipping empty fill");
            return;
        }
        let bytes = color.to_bytes();
        for y in area.y0 as usize..area.y1 as usize {
            let start = self.offset(area.x0 as usize, y);
            let end = self.offset(area.x1 as usize, y);
            for pixel in self.pixels[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&bytes);
            }
        }
    }
}

/// Allocates `Framebuffer`s, refusing empty or oversized requests.
#[derive(Debug, Clone)]
pub struct FramebufferFactory {
    max_pixels: u64,
    allocated: u64,
}

impl FramebufferFactory {
    pub fn new(max_pixels: u64) -> Self {
        Self {
            max_pixels,
            allocated: 0,
        }
    }

    /// Number of framebuffers handed out so far.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }
}

impl SurfaceFactory for FramebufferFactory {
    type Surface = Framebuffer;

    fn new_surface(&mut self, width: u32, height: u32) -> Result<Framebuffer> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 {
            bail!("cannot allocate an empty {}x{} surface", width, height);
        }
        if pixels > self.max_pixels {
            bail!(
                "{}x{} surface exceeds the {} pixel budget",
                width,
                height,
                self.max_pixels
            );
        }
        self.allocated += 1;
        debug!(
            "FramebufferFactory: allocated {}x{} surface #{}",
            width, height, self.allocated
        );
        Ok(Framebuffer::new(width, height))
    }
}
