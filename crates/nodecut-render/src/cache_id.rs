//! Disk cache identity.
//!
//! A cache ID names the on-disk cache a backend's output belongs to. It is
//! a digest over everything that determines the byte layout and content of
//! that cache: the graph identity, its structural revision, and the render
//! parameters. Equal inputs always produce the same ID; any parameter
//! change produces a different one, which implicitly invalidates the whole
//! cache without touching its files.

use nodecut_core::{AudioParams, RenderMode, VideoParams};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Hex-encoded digest naming a backend cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheId(String);

impl CacheId {
    fn digest(tag: &str, graph: Uuid, revision: u64, params: &impl Serialize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(tag.as_bytes());
        hasher.update(graph.as_bytes());
        hasher.update(revision.to_le_bytes());
        // serde_json gives a stable field order for these flat structs
        hasher.update(serde_json::to_vec(params).unwrap_or_default());
        let digest = hasher.finalize();
        use fmt::Write;
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{:02x}", byte);
        }
        Self(hex)
    }

    /// Identity of an audio backend's PCM cache.
    pub fn audio(graph: Uuid, revision: u64, params: &AudioParams) -> Self {
        Self::digest("audio", graph, revision, params)
    }

    /// Identity of a video backend's frame cache.
    pub fn video(graph: Uuid, revision: u64, params: &VideoParams, mode: RenderMode) -> Self {
        Self::digest("video", graph, revision, &(params, mode))
    }

    /// The hex digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodecut_core::{ChannelLayout, SampleFormat};

    #[test]
    fn test_same_inputs_same_id() {
        let graph = Uuid::new_v4();
        let params = AudioParams::default();
        assert_eq!(
            CacheId::audio(graph, 3, &params),
            CacheId::audio(graph, 3, &params)
        );
    }

    #[test]
    fn test_sample_rate_changes_id() {
        let graph = Uuid::new_v4();
        let a = AudioParams::new(48000, ChannelLayout::Stereo, SampleFormat::F32);
        let b = AudioParams::new(44100, ChannelLayout::Stereo, SampleFormat::F32);
        assert_ne!(CacheId::audio(graph, 0, &a), CacheId::audio(graph, 0, &b));
    }

    #[test]
    fn test_revision_changes_id() {
        let graph = Uuid::new_v4();
        let params = VideoParams::default();
        assert_ne!(
            CacheId::video(graph, 1, &params, RenderMode::Online),
            CacheId::video(graph, 2, &params, RenderMode::Online)
        );
    }

    #[test]
    fn test_audio_and_video_ids_never_collide() {
        let graph = Uuid::new_v4();
        let a = CacheId::audio(graph, 0, &AudioParams::default());
        let v = CacheId::video(graph, 0, &VideoParams::default(), RenderMode::Online);
        assert_ne!(a, v);
    }

    #[test]
    fn test_id_is_hex() {
        let id = CacheId::audio(Uuid::new_v4(), 0, &AudioParams::default());
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
