//! Footage and stream descriptors.
//!
//! A `Footage` references a decodable media source. It is owned by the
//! project; nodes hold shared references and never mutate it.

use nodecut_core::RationalTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Kind of a media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
}

/// A single stream inside a footage source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    /// Stream index within the source.
    pub index: usize,
    /// Stream kind.
    pub kind: StreamKind,
    /// Stream duration, if known.
    pub duration: Option<RationalTime>,
}

/// Reference to a specific stream of a specific footage source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRef {
    /// Identity of the owning footage.
    pub footage: Uuid,
    /// Stream index within that footage.
    pub index: usize,
    /// Stream kind.
    pub kind: StreamKind,
}

/// A decodable media source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footage {
    /// Stable identity.
    pub id: Uuid,
    /// Source location.
    pub path: PathBuf,
    /// Identifier of the decoder able to read this source.
    pub decoder_kind: String,
    /// Streams found in the source.
    pub streams: Vec<Stream>,
}

impl Footage {
    /// Create a footage descriptor.
    pub fn new(path: impl Into<PathBuf>, decoder_kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            decoder_kind: decoder_kind.into(),
            streams: Vec::new(),
        }
    }

    /// Add a stream descriptor, returning self for chaining.
    pub fn with_stream(mut self, kind: StreamKind, duration: Option<RationalTime>) -> Self {
        let index = self.streams.len();
        self.streams.push(Stream {
            index,
            kind,
            duration,
        });
        self
    }

    /// First stream of the given kind, if any.
    pub fn first_stream(&self, kind: StreamKind) -> Option<StreamRef> {
        self.streams
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| StreamRef {
                footage: self.id,
                index: s.index,
                kind: s.kind,
            })
    }

    /// Stream descriptor by index.
    pub fn stream(&self, index: usize) -> Option<&Stream> {
        self.streams.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_stream_by_kind() {
        let footage = Footage::new("clip.mov", "pattern")
            .with_stream(StreamKind::Video, Some(RationalTime::new(10, 1)))
            .with_stream(StreamKind::Audio, Some(RationalTime::new(10, 1)));

        let video = footage.first_stream(StreamKind::Video).unwrap();
        assert_eq!(video.index, 0);
        let audio = footage.first_stream(StreamKind::Audio).unwrap();
        assert_eq!(audio.index, 1);
        assert!(footage.first_stream(StreamKind::Subtitle).is_none());
    }
}
