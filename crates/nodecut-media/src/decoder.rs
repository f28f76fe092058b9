//! The decoder contract and registry.
//!
//! Codec backends are external to the engine; the graph consumes them
//! through the `Decoder` trait. A registry maps decoder-kind identifiers
//! to factories so footage can name its decoder without linking to it.

use crate::footage::{Footage, StreamKind, StreamRef};
use nodecut_core::{AudioParams, Frame, RationalTime, SampleBuffer, TimeRange};
use std::collections::HashMap;
use tracing::{debug, info};

/// Per-format frame retrieval keyed by time.
///
/// A decoder is bound to exactly one stream, set once on first use.
/// Retrieval failures (time out of range, decode errors) surface as `None`
/// so that graph evaluation degrades to empty output instead of failing.
pub trait Decoder: Send {
    /// The stream this decoder is bound to, if any.
    fn stream(&self) -> Option<&StreamRef>;

    /// Bind the decoder to a stream. Rebinding an already-bound decoder is
    /// ignored.
    fn set_stream(&mut self, stream: StreamRef);

    /// Retrieve the decoded frame nearest `time`.
    fn retrieve(&mut self, time: RationalTime) -> Option<Frame>;

    /// Retrieve decoded audio covering `range`, conformed to `params`.
    fn retrieve_samples(&mut self, range: TimeRange, params: &AudioParams) -> Option<SampleBuffer> {
        let _ = (range, params);
        None
    }
}

type DecoderFactory = Box<dyn Fn(&Footage) -> Option<Box<dyn Decoder>> + Send + Sync>;

/// Registry of decoder factories keyed by decoder-kind identifier.
#[derive(Default)]
pub struct DecoderRegistry {
    factories: HashMap<String, DecoderFactory>,
}

impl DecoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in decoders registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("pattern", |footage| {
            Some(Box::new(PatternDecoder::new(footage)) as Box<dyn Decoder>)
        });
        registry
    }

    /// Register a decoder factory under a kind identifier.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&Footage) -> Option<Box<dyn Decoder>> + Send + Sync + 'static,
    {
        let kind = kind.into();
        debug!(kind = %kind, "registering decoder factory");
        self.factories.insert(kind, Box::new(factory));
    }

    /// Instantiate a decoder for `footage` by its declared kind.
    ///
    /// Unknown kinds and failed instantiation both yield `None`.
    pub fn create_from_id(&self, footage: &Footage) -> Option<Box<dyn Decoder>> {
        let factory = self.factories.get(&footage.decoder_kind)?;
        let decoder = factory(footage);
        if decoder.is_some() {
            info!(kind = %footage.decoder_kind, path = %footage.path.display(), "decoder bound");
        }
        decoder
    }
}

// ── Built-in test pattern decoder ───────────────────────────────

/// Synthetic decoder producing color bars and a sine tone.
///
/// Used by tests and as a placeholder while footage is relinking.
pub struct PatternDecoder {
    footage: Footage,
    stream: Option<StreamRef>,
    width: u32,
    height: u32,
    duration: RationalTime,
}

impl PatternDecoder {
    /// Create a pattern decoder for the given footage.
    pub fn new(footage: &Footage) -> Self {
        Self {
            footage: footage.clone(),
            stream: None,
            width: 1280,
            height: 720,
            duration: RationalTime::new(10, 1),
        }
    }

    /// Override the generated frame size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Decoder for PatternDecoder {
    fn stream(&self) -> Option<&StreamRef> {
        self.stream.as_ref()
    }

    fn set_stream(&mut self, stream: StreamRef) {
        if self.stream.is_none() {
            self.stream = Some(stream);
        }
    }

    fn retrieve(&mut self, time: RationalTime) -> Option<Frame> {
        let stream = self.stream.as_ref()?;
        if stream.kind != StreamKind::Video {
            return None;
        }
        let duration = self
            .footage
            .stream(stream.index)
            .and_then(|s| s.duration)
            .unwrap_or(self.duration);
        if time < RationalTime::ZERO || time >= duration {
            return None;
        }
        Some(Frame::test_pattern(self.width, self.height))
    }

    fn retrieve_samples(&mut self, range: TimeRange, params: &AudioParams) -> Option<SampleBuffer> {
        let stream = self.stream.as_ref()?;
        if stream.kind != StreamKind::Audio {
            return None;
        }
        let duration = self
            .footage
            .stream(stream.index)
            .and_then(|s| s.duration)
            .unwrap_or(self.duration);
        if range.start < RationalTime::ZERO || range.start >= duration {
            return None;
        }

        let channels = params.channel_count();
        let first = params.time_to_samples(range.start);
        let frames = (params.time_to_samples(range.end) - first).max(0) as usize;
        let mut buf = SampleBuffer::silence(params.sample_rate, channels, frames);

        // 440 Hz reference tone, silent past the stream's end
        let last = (params.time_to_samples(duration) - first).max(0) as usize;
        let step = 440.0 * std::f32::consts::TAU / params.sample_rate as f32;
        for i in 0..frames.min(last) {
            let v = ((first as usize + i) as f32 * step).sin() * 0.5;
            for c in 0..channels as usize {
                buf.data[i * channels as usize + c] = v;
            }
        }
        Some(buf)
    }
}
