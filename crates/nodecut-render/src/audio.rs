//! The audio render backend.
//!
//! Owns the render parameters, a packed PCM buffer indexed by time, and
//! the dirty ranges pending re-render. The PCM buffer's bytes are only
//! meaningful under the cache ID current when they were written; any
//! parameter or graph change produces a new ID and implicitly orphans the
//! old bytes.

use crate::backend::RenderState;
use crate::cache_id::CacheId;
use crate::dirty::DirtyRangeSet;
use crossbeam_channel::Receiver;
use nodecut_core::{AudioParams, NodecutError, RationalTime, Result, TimeRange};
use nodecut_graph::{EvalContext, NodeGraph, NodeId};
use nodecut_media::DecoderRegistry;
use tracing::{debug, info};

/// Renders the audio output of a graph into a packed PCM buffer.
pub struct AudioRenderBackend {
    params: AudioParams,
    length: RationalTime,
    pcm: Vec<u8>,
    dirty: DirtyRangeSet,
    state: RenderState,
}

impl AudioRenderBackend {
    /// Create a backend covering `[0, length)`, entirely dirty.
    pub fn new(params: AudioParams, length: RationalTime) -> Self {
        let backend = Self {
            params,
            length,
            pcm: vec![0; params.time_to_bytes(length)],
            dirty: DirtyRangeSet::new(),
            state: RenderState::Stopped,
        };
        backend.dirty.insert(backend.full_range());
        backend
    }

    fn full_range(&self) -> TimeRange {
        TimeRange::new(RationalTime::ZERO, self.length)
    }

    /// Current render parameters.
    pub fn params(&self) -> AudioParams {
        self.params
    }

    /// Length of the rendered span.
    pub fn length(&self) -> RationalTime {
        self.length
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// The packed PCM buffer. Bytes inside a dirty range are stale.
    pub fn pcm(&self) -> &[u8] {
        &self.pcm
    }

    /// Pending dirty ranges, in time order.
    pub fn dirty_ranges(&self) -> Vec<TimeRange> {
        self.dirty.snapshot()
    }

    /// Replace the render parameters. Only legal while stopped; the buffer
    /// is relaid out and everything becomes dirty, and the cache ID of
    /// this backend changes.
    pub fn set_parameters(&mut self, params: AudioParams) -> Result<()> {
        if self.state.is_rendering() {
            return Err(NodecutError::IllegalState(
                "cannot change parameters while rendering".to_string(),
            ));
        }
        if params == self.params {
            return Ok(());
        }
        info!(sample_rate = params.sample_rate, "audio parameters changed");
        self.params = params;
        self.pcm = vec![0; params.time_to_bytes(self.length)];
        self.dirty.clear();
        self.dirty.insert(self.full_range());
        Ok(())
    }

    /// Change the rendered span. Only legal while stopped. Newly exposed
    /// time becomes dirty; truncated dirty ranges are clipped away on the
    /// next drain.
    pub fn set_length(&mut self, length: RationalTime) -> Result<()> {
        if self.state.is_rendering() {
            return Err(NodecutError::IllegalState(
                "cannot change length while rendering".to_string(),
            ));
        }
        let old = self.length;
        self.length = length;
        self.pcm.resize(self.params.time_to_bytes(length), 0);
        if length > old {
            self.dirty.insert(TimeRange::new(old, length));
        }
        Ok(())
    }

    /// Mark `range` as needing re-render, clipped to the rendered span and
    /// merged with existing dirty ranges.
    pub fn invalidate_cache(&self, range: TimeRange) {
        if let Some(clipped) = self.full_range().intersection(range) {
            debug!(?clipped, "audio cache invalidated");
            self.dirty.insert(clipped);
        }
    }

    /// The cache namespace this backend's output currently belongs to.
    pub fn cache_id(&self, graph: &NodeGraph) -> CacheId {
        CacheId::audio(graph.id(), graph.revision(), &self.params)
    }

    /// Enter the rendering state. Fails if a render is already in flight.
    pub fn start_render(&mut self) -> Result<()> {
        if self.state.is_rendering() {
            return Err(NodecutError::IllegalState(
                "render already in flight".to_string(),
            ));
        }
        self.state = RenderState::Rendering;
        Ok(())
    }

    /// Return to the stopped state.
    pub fn finish_render(&mut self) {
        self.state = RenderState::Stopped;
    }

    /// Render every dirty range by pulling `viewer`'s sample output from
    /// the graph, writing packed bytes at their time offsets. Ranges the
    /// graph produces nothing for are written as silence.
    ///
    /// A message on `cancel` abandons the drain: rendered ranges stay
    /// clean, unrendered ranges stay dirty. Returns the number of ranges
    /// rendered. Holding the graph mutably for the whole drain keeps
    /// structural edits out while rendering.
    pub fn render_dirty(
        &mut self,
        graph: &mut NodeGraph,
        viewer: NodeId,
        decoders: &DecoderRegistry,
        cancel: Option<&Receiver<()>>,
    ) -> Result<usize> {
        self.start_render()?;
        let ranges = self.dirty.drain();
        let mut rendered = 0;

        for (i, range) in ranges.iter().enumerate() {
            if cancel.is_some_and(|c| c.try_recv().is_ok()) {
                info!(remaining = ranges.len() - i, "audio render cancelled");
                for rest in &ranges[i..] {
                    self.dirty.insert(*rest);
                }
                break;
            }

            // Length change may have left stale dirty ranges behind
            let range = match self.full_range().intersection(*range) {
                Some(r) => r,
                None => continue,
            };

            let mut ctx = EvalContext::new(decoders).at(range.start);
            ctx.audio = self.params;
            ctx.audio_span = range.duration();

            let value = graph.value(viewer, "samples", &mut ctx);
            let offset = self.params.time_to_bytes(range.start);
            let span = self.params.time_to_bytes(range.end) - offset;
            let end = (offset + span).min(self.pcm.len());
            self.pcm[offset..end].fill(0);

            if let Some(samples) = value.as_samples() {
                if samples.matches(&self.params) {
                    let bytes = samples.to_packed_bytes(&self.params);
                    let n = bytes.len().min(end - offset);
                    self.pcm[offset..offset + n].copy_from_slice(&bytes[..n]);
                } else {
                    debug!("sample buffer does not match backend parameters, writing silence");
                }
            }
            rendered += 1;
        }

        self.finish_render();
        Ok(rendered)
    }
}
