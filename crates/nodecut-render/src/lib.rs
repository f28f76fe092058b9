//! NodeCut Render - Audio and video render backends
//!
//! The backends own render parameters, dirty-range bookkeeping, and the
//! cache identity of their output. They pull from a viewer node in the
//! graph and stay stopped whenever parameters may change.

pub mod audio;
pub mod backend;
pub mod cache_id;
pub mod dirty;
pub mod video;

pub use audio::AudioRenderBackend;
pub use backend::RenderState;
pub use cache_id::CacheId;
pub use dirty::DirtyRangeSet;
pub use video::VideoRenderBackend;
