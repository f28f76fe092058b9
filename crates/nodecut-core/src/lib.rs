//! NodeCut Core - Foundation types for the compositing engine
//!
//! This crate provides the fundamental types used throughout NodeCut:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - Frame buffers and pixel formats
//! - Audio sample buffers
//! - Render parameter sets

pub mod error;
pub mod frame;
pub mod params;
pub mod samples;
pub mod time;

pub use error::{NodecutError, Result};
pub use frame::{Frame, PixelFormat};
pub use params::{AudioParams, ChannelLayout, RenderMode, SampleFormat, VideoParams};
pub use samples::SampleBuffer;
pub use time::{FrameRate, RationalTime, TimeRange};
