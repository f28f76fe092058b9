//! GPU texture management.

use crate::context::GraphicsContext;
use nodecut_core::{Frame, NodecutError, PixelFormat, Result};

/// Map an engine pixel format to its wgpu texture format.
pub fn texture_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
        PixelFormat::Rgba16F => wgpu::TextureFormat::Rgba16Float,
        PixelFormat::Rgba32F => wgpu::TextureFormat::Rgba32Float,
    }
}

/// A GPU texture that can hold frame data.
///
/// `destroy` is idempotent; destroying an already-destroyed texture is a
/// no-op, as the external contract requires.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl GpuTexture {
    /// Create a new GPU texture with the given dimensions.
    pub fn new(
        ctx: &GraphicsContext,
        width: u32,
        height: u32,
        format: PixelFormat,
        label: Option<&str>,
    ) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(format),
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
            format,
        }
    }

    /// Create a texture and upload `frame` into it in one step.
    pub fn from_frame(ctx: &GraphicsContext, frame: &Frame, label: Option<&str>) -> Result<Self> {
        let texture = Self::new(ctx, frame.width, frame.height, frame.format, label);
        texture.upload(ctx, frame)?;
        Ok(texture)
    }

    /// Whether this texture matches the given frame's layout.
    pub fn matches(&self, width: u32, height: u32, format: PixelFormat) -> bool {
        self.width == width && self.height == height && self.format == format
    }

    /// Upload a frame's pixel data into this texture in place.
    pub fn upload(&self, ctx: &GraphicsContext, frame: &Frame) -> Result<()> {
        if !self.matches(frame.width, frame.height, frame.format) {
            return Err(NodecutError::Gpu(format!(
                "frame {}x{} {:?} does not match texture {}x{} {:?}",
                frame.width, frame.height, frame.format, self.width, self.height, self.format
            )));
        }

        let bytes_per_row = frame.width as usize * frame.format.bytes_per_pixel();

        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &frame.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row as u32),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }

    /// Destroy the underlying GPU resource. Safe to call redundantly.
    pub fn destroy(&self) {
        self.texture.destroy();
    }

    /// Memory usage estimate in bytes.
    pub fn memory_size(&self) -> usize {
        (self.width as usize) * (self.height as usize) * self.format.bytes_per_pixel()
    }
}
