//! Decoded frame buffers in CPU memory.
//!
//! Frames travel from a decoder through the color pipeline and up to the
//! GPU texture stage. They are uniquely owned until handed to that stage.

use serde::{Deserialize, Serialize};

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// 16-bit RGBA half-float (64 bits per pixel)
    Rgba16F,
    /// 32-bit RGBA float (128 bits per pixel)
    Rgba32F,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Rgba16F => 8,
            Self::Rgba32F => 16,
        }
    }

    /// Total bytes needed for a tightly packed frame of this format.
    pub fn frame_size(self, width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * self.bytes_per_pixel()
    }
}

/// A decoded video frame in CPU memory (tightly packed, no row padding).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Pixel format
    pub format: PixelFormat,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw pixel data, `format.frame_size(width, height)` bytes
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a zero-filled frame.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            format,
            width,
            height,
            data: vec![0u8; format.frame_size(width, height)],
        }
    }

    /// Total memory usage of this frame in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }

    /// View the pixel data as `f32` components. Only valid for `Rgba32F`.
    pub fn as_f32(&self) -> Option<&[f32]> {
        if self.format != PixelFormat::Rgba32F {
            return None;
        }
        Some(bytemuck::cast_slice(&self.data))
    }

    /// Mutable `f32` view of the pixel data. Only valid for `Rgba32F`.
    pub fn as_f32_mut(&mut self) -> Option<&mut [f32]> {
        if self.format != PixelFormat::Rgba32F {
            return None;
        }
        Some(bytemuck::cast_slice_mut(&mut self.data))
    }

    /// Convert this frame to another pixel format, consuming it.
    ///
    /// Returns `None` for conversions with no CPU path (half-float data is
    /// only handled on the GPU).
    pub fn convert(self, target: PixelFormat) -> Option<Frame> {
        if self.format == target {
            return Some(self);
        }

        match (self.format, target) {
            (PixelFormat::Rgba8, PixelFormat::Rgba32F) => {
                let mut out = Frame::new(self.width, self.height, PixelFormat::Rgba32F);
                {
                    let dst: &mut [f32] = bytemuck::cast_slice_mut(&mut out.data);
                    for (d, s) in dst.iter_mut().zip(self.data.iter()) {
                        *d = *s as f32 / 255.0;
                    }
                }
                Some(out)
            }
            (PixelFormat::Rgba32F, PixelFormat::Rgba8) => {
                let mut out = Frame::new(self.width, self.height, PixelFormat::Rgba8);
                let src: &[f32] = bytemuck::cast_slice(&self.data);
                for (d, s) in out.data.iter_mut().zip(src.iter()) {
                    *d = (s.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
                Some(out)
            }
            _ => None,
        }
    }

    /// Create a test pattern frame (color bars) in RGBA8.
    pub fn test_pattern(width: u32, height: u32) -> Self {
        let mut frame = Self::new(width, height, PixelFormat::Rgba8);

        let colors: [[u8; 4]; 8] = [
            [255, 255, 255, 255], // White
            [255, 255, 0, 255],   // Yellow
            [0, 255, 255, 255],   // Cyan
            [0, 255, 0, 255],     // Green
            [255, 0, 255, 255],   // Magenta
            [255, 0, 0, 255],     // Red
            [0, 0, 255, 255],     // Blue
            [0, 0, 0, 255],       // Black
        ];

        for y in 0..height {
            for x in 0..width {
                let i = ((y * width + x) * 4) as usize;
                let bar = (x * 8 / width).min(7) as usize;
                frame.data[i..i + 4].copy_from_slice(&colors[bar]);
            }
        }

        frame
    }
}
