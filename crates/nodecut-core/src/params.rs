//! Render parameter sets shared by the backends and the evaluation context.
//!
//! These types fully determine the byte layout of cached output: any change
//! to them must change the owning backend's cache ID.

use crate::frame::PixelFormat;
use crate::time::{FrameRate, RationalTime};
use serde::{Deserialize, Serialize};

/// Render execution strategy.
///
/// Online prefers interactive accuracy (CPU color transforms); Offline
/// prefers throughput (color transforms folded into the GPU blit). This is
/// a configurable strategy, not a fixed architectural split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Online,
    Offline,
}

/// Packed sample format for cached PCM data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleFormat {
    /// 32-bit float, native mixing format.
    #[default]
    F32,
    /// Signed 16-bit integer.
    S16,
}

impl SampleFormat {
    /// Bytes per single-channel sample.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::S16 => 2,
        }
    }

    /// Pack interleaved f32 samples into this format's byte representation.
    pub fn pack(self, samples: &[f32]) -> Vec<u8> {
        match self {
            Self::F32 => samples.iter().flat_map(|s| s.to_le_bytes()).collect(),
            Self::S16 => samples
                .iter()
                .flat_map(|s| {
                    let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                    v.to_le_bytes()
                })
                .collect(),
        }
    }
}

/// Speaker layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChannelLayout {
    Mono,
    #[default]
    Stereo,
    Surround51,
}

impl ChannelLayout {
    /// Number of channels in this layout.
    pub fn channel_count(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
            Self::Surround51 => 6,
        }
    }
}

/// Parameters that define the audio backend's buffer layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioParams {
    /// Samples per second.
    pub sample_rate: u32,
    /// Speaker layout.
    pub layout: ChannelLayout,
    /// Packed sample format.
    pub format: SampleFormat,
}

impl AudioParams {
    /// Create a new parameter set.
    pub fn new(sample_rate: u32, layout: ChannelLayout, format: SampleFormat) -> Self {
        Self {
            sample_rate,
            layout,
            format,
        }
    }

    /// Interleaved channel count.
    pub fn channel_count(&self) -> u16 {
        self.layout.channel_count()
    }

    /// Bytes per interleaved sample frame (one sample for every channel).
    pub fn bytes_per_sample_frame(&self) -> usize {
        self.channel_count() as usize * self.format.bytes_per_sample()
    }

    /// Number of whole sample frames before `time` (floored).
    pub fn time_to_samples(&self, time: RationalTime) -> i64 {
        time.to_samples(self.sample_rate)
    }

    /// Byte offset of the sample frame at `time` in the packed buffer.
    pub fn time_to_bytes(&self, time: RationalTime) -> usize {
        self.time_to_samples(time).max(0) as usize * self.bytes_per_sample_frame()
    }

    /// Time corresponding to a packed byte offset.
    pub fn bytes_to_time(&self, bytes: usize) -> RationalTime {
        let frames = bytes / self.bytes_per_sample_frame();
        RationalTime::from_samples(frames as i64, self.sample_rate)
    }
}

impl Default for AudioParams {
    fn default() -> Self {
        Self::new(48000, ChannelLayout::Stereo, SampleFormat::F32)
    }
}

/// Parameters that define the video backend's output frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoParams {
    /// Target frame width in pixels.
    pub width: u32,
    /// Target frame height in pixels.
    pub height: u32,
    /// Target pixel format.
    pub format: PixelFormat,
    /// Timeline frame rate.
    pub frame_rate: FrameRate,
}

impl VideoParams {
    /// Create a new parameter set.
    pub fn new(width: u32, height: u32, format: PixelFormat, frame_rate: FrameRate) -> Self {
        Self {
            width,
            height,
            format,
            frame_rate,
        }
    }

    /// Frame index for a time (floored).
    pub fn time_to_frame(&self, time: RationalTime) -> i64 {
        time.to_frames(self.frame_rate)
    }

    /// Start time of a frame index.
    pub fn frame_to_time(&self, frame: i64) -> RationalTime {
        RationalTime::from_frames(frame, self.frame_rate)
    }
}

impl Default for VideoParams {
    fn default() -> Self {
        Self::new(1920, 1080, PixelFormat::Rgba8, FrameRate::FPS_24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_to_bytes_stereo_f32() {
        let params = AudioParams::default();
        // One second of 48kHz stereo f32 = 48000 * 2 * 4 bytes
        assert_eq!(params.time_to_bytes(RationalTime::new(1, 1)), 384_000);
        assert_eq!(params.bytes_to_time(384_000), RationalTime::new(1, 1));
    }

    #[test]
    fn test_negative_time_clamps_to_zero_offset() {
        let params = AudioParams::default();
        assert_eq!(params.time_to_bytes(RationalTime::new(-1, 1)), 0);
    }

    #[test]
    fn test_s16_packing_clamps() {
        let packed = SampleFormat::S16.pack(&[2.0, -2.0]);
        assert_eq!(packed.len(), 4);
        let hi = i16::from_le_bytes([packed[0], packed[1]]);
        let lo = i16::from_le_bytes([packed[2], packed[3]]);
        assert_eq!(hi, i16::MAX);
        assert_eq!(lo, -i16::MAX);
    }

    #[test]
    fn test_video_frame_mapping() {
        let params = VideoParams::default();
        let t = params.frame_to_time(48);
        assert_eq!(t, RationalTime::new(2, 1));
        assert_eq!(params.time_to_frame(t), 48);
    }
}
