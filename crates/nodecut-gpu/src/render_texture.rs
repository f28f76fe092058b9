//! Double-buffered render textures.
//!
//! A render texture keeps two GPU textures so an in-progress write never
//! aliases the buffer currently being read for display. Writers render
//! into the back buffer and call `swap` on completion; an abandoned render
//! simply never swaps, leaving the front buffer intact.

use crate::context::GraphicsContext;
use crate::texture::GpuTexture;
use nodecut_core::PixelFormat;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// GPU-resident double-buffered image.
pub struct RenderTexture {
    buffers: [GpuTexture; 2],
    front: AtomicUsize,
    released: AtomicBool,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl RenderTexture {
    /// Create a double-buffered texture at the given size and format.
    pub fn new(ctx: &GraphicsContext, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            buffers: [
                GpuTexture::new(ctx, width, height, format, Some("RenderTexture A")),
                GpuTexture::new(ctx, width, height, format, Some("RenderTexture B")),
            ],
            front: AtomicUsize::new(0),
            released: AtomicBool::new(false),
            width,
            height,
            format,
        }
    }

    /// The buffer currently safe to read for display.
    pub fn front(&self) -> &GpuTexture {
        &self.buffers[self.front.load(Ordering::Acquire)]
    }

    /// The buffer writers render into.
    pub fn back(&self) -> &GpuTexture {
        &self.buffers[1 - self.front.load(Ordering::Acquire)]
    }

    /// Publish the back buffer as the new front buffer.
    pub fn swap(&self) {
        self.front.fetch_xor(1, Ordering::AcqRel);
    }

    /// Whether this texture matches the given layout.
    pub fn matches(&self, width: u32, height: u32, format: PixelFormat) -> bool {
        self.width == width && self.height == height && self.format == format
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Destroy both buffers. Idempotent; later calls are no-ops.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.buffers[0].destroy();
            self.buffers[1].destroy();
        }
    }
}
