//! Audio sample buffers exchanged between decoders and the render backend.

use crate::params::AudioParams;
use crate::time::RationalTime;

/// A block of interleaved f32 audio samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBuffer {
    /// Samples per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Interleaved sample data, `frame_count * channels` values.
    pub data: Vec<f32>,
}

impl SampleBuffer {
    /// Create a silent buffer covering `frames` sample frames.
    pub fn silence(sample_rate: u32, channels: u16, frames: usize) -> Self {
        Self {
            sample_rate,
            channels,
            data: vec![0.0; frames * channels as usize],
        }
    }

    /// Number of sample frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.data.len() / self.channels as usize
        }
    }

    /// Duration covered by this buffer.
    pub fn duration(&self) -> RationalTime {
        RationalTime::from_samples(self.frame_count() as i64, self.sample_rate)
    }

    /// Whether this buffer matches the given render parameters.
    pub fn matches(&self, params: &AudioParams) -> bool {
        self.sample_rate == params.sample_rate && self.channels == params.channel_count()
    }

    /// Serialize to the packed byte representation demanded by `params`.
    pub fn to_packed_bytes(&self, params: &AudioParams) -> Vec<u8> {
        params.format.pack(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ChannelLayout, SampleFormat};

    #[test]
    fn test_silence_duration() {
        let buf = SampleBuffer::silence(48000, 2, 48000);
        assert_eq!(buf.frame_count(), 48000);
        assert_eq!(buf.duration(), RationalTime::new(1, 1));
    }

    #[test]
    fn test_matches_params() {
        let buf = SampleBuffer::silence(48000, 2, 16);
        let params = AudioParams::new(48000, ChannelLayout::Stereo, SampleFormat::F32);
        assert!(buf.matches(&params));
        let mono = AudioParams::new(48000, ChannelLayout::Mono, SampleFormat::F32);
        assert!(!buf.matches(&mono));
    }
}
