//! NodeCut GPU - Texture pipeline
//!
//! Owns the graphics context, GPU textures, the double-buffered render
//! textures node outputs travel in, and the shader pipelines that blit and
//! composite them. Everything here must run on the thread owning the
//! graphics context.

pub mod blend;
pub mod blit;
pub mod composite;
pub mod context;
pub mod render_texture;
pub mod texture;

pub use blend::BlendMode;
pub use blit::{BlitParams, BlitPipeline};
pub use composite::CompositePipeline;
pub use context::GraphicsContext;
pub use render_texture::RenderTexture;
pub use texture::{texture_format, GpuTexture};
