//! The video render backend.
//!
//! Same state machine and dirty-range model as the audio backend, driving
//! the graph's texture output one frame at a time. The produced textures
//! are GPU-resident and double-buffered by the nodes that own them, so the
//! backend retains only the most recently rendered frame for display;
//! frames inside a dirty range are re-pulled on the next drain.

use crate::backend::RenderState;
use crate::cache_id::CacheId;
use crate::dirty::DirtyRangeSet;
use crossbeam_channel::Receiver;
use nodecut_core::{NodecutError, RationalTime, RenderMode, Result, TimeRange, VideoParams};
use nodecut_gpu::{GraphicsContext, RenderTexture};
use nodecut_graph::{EvalContext, NodeGraph, NodeId};
use nodecut_media::DecoderRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// Renders the video output of a graph frame by frame.
pub struct VideoRenderBackend {
    params: VideoParams,
    mode: RenderMode,
    length: RationalTime,
    dirty: DirtyRangeSet,
    state: RenderState,
    last_frame: Option<(i64, Arc<RenderTexture>)>,
}

impl VideoRenderBackend {
    /// Create a backend covering `[0, length)`, entirely dirty.
    pub fn new(params: VideoParams, mode: RenderMode, length: RationalTime) -> Self {
        let backend = Self {
            params,
            mode,
            length,
            dirty: DirtyRangeSet::new(),
            state: RenderState::Stopped,
            last_frame: None,
        };
        backend.dirty.insert(backend.full_range());
        backend
    }

    fn full_range(&self) -> TimeRange {
        TimeRange::new(RationalTime::ZERO, self.length)
    }

    /// Current render parameters.
    pub fn params(&self) -> VideoParams {
        self.params
    }

    /// Current execution strategy.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Pending dirty ranges, in time order.
    pub fn dirty_ranges(&self) -> Vec<TimeRange> {
        self.dirty.snapshot()
    }

    /// Replace the render parameters. Only legal while stopped; everything
    /// becomes dirty and the cache ID changes.
    pub fn set_parameters(&mut self, params: VideoParams) -> Result<()> {
        if self.state.is_rendering() {
            return Err(NodecutError::IllegalState(
                "cannot change parameters while rendering".to_string(),
            ));
        }
        if params == self.params {
            return Ok(());
        }
        info!(width = params.width, height = params.height, "video parameters changed");
        self.params = params;
        self.last_frame = None;
        self.dirty.clear();
        self.dirty.insert(self.full_range());
        Ok(())
    }

    /// Switch between online and offline rendering. Only legal while
    /// stopped; output bytes differ between the paths, so everything
    /// becomes dirty.
    pub fn set_mode(&mut self, mode: RenderMode) -> Result<()> {
        if self.state.is_rendering() {
            return Err(NodecutError::IllegalState(
                "cannot change mode while rendering".to_string(),
            ));
        }
        if mode != self.mode {
            self.mode = mode;
            self.last_frame = None;
            self.dirty.clear();
            self.dirty.insert(self.full_range());
        }
        Ok(())
    }

    /// Mark `range` as needing re-render, clipped to the rendered span.
    /// A retained frame inside the range is dropped.
    pub fn invalidate_cache(&mut self, range: TimeRange) {
        let clipped = match self.full_range().intersection(range) {
            Some(r) => r,
            None => return,
        };
        debug!(?clipped, "video cache invalidated");
        self.dirty.insert(clipped);
        if let Some((frame, _)) = self.last_frame {
            let shown = TimeRange::from_start_duration(
                self.params.frame_to_time(frame),
                self.params.frame_rate.frame_duration(),
            );
            if shown.overlaps(clipped) {
                self.last_frame = None;
            }
        }
    }

    /// The cache namespace this backend's output currently belongs to.
    pub fn cache_id(&self, graph: &NodeGraph) -> CacheId {
        CacheId::video(graph.id(), graph.revision(), &self.params, self.mode)
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

    /// Render the frame covering `time` by pulling `viewer`'s texture
    /// output. Re-requesting the same frame without an intervening
    /// invalidation returns the retained texture without re-evaluating.
    pub fn render_frame(
        &mut self,
        graph: &mut NodeGraph,
        viewer: NodeId,
        decoders: &DecoderRegistry,
        gfx: &GraphicsContext,
        time: RationalTime,
    ) -> Option<Arc<RenderTexture>> {
        let frame = self.params.time_to_frame(time);
        if let Some((cached, texture)) = &self.last_frame {
            if *cached == frame {
                return Some(Arc::clone(texture));
            }
        }

        let mut ctx = EvalContext::new(decoders)
            .at(self.params.frame_to_time(frame))
            .with_gfx(gfx);
        ctx.video = self.params;
        ctx.mode = self.mode;

        let texture = graph.value(viewer, "texture", &mut ctx).as_texture().cloned()?;
        self.last_frame = Some((frame, Arc::clone(&texture)));
        Some(texture)
    }

    /// Render every frame inside every dirty range. A message on `cancel`
    /// abandons the drain, leaving unrendered ranges dirty. Returns the
    /// number of frames evaluated.
    pub fn render_dirty(
        &mut self,
        graph: &mut NodeGraph,
        viewer: NodeId,
        decoders: &DecoderRegistry,
        gfx: &GraphicsContext,
        cancel: Option<&Receiver<()>>,
    ) -> Result<usize> {
        self.start_render()?;
        let ranges = self.dirty.drain();
        let mut rendered = 0;
        let mut cancelled = false;

        'ranges: for (i, range) in ranges.iter().enumerate() {
            let range = match self.full_range().intersection(*range) {
                Some(r) => r,
                None => continue,
            };

            let first = self.params.time_to_frame(range.start);
            let mut frame = first;
            while self.params.frame_to_time(frame) < range.end {
                if cancel.is_some_and(|c| c.try_recv().is_ok()) {
                    info!("video render cancelled");
                    // The partially rendered range stays dirty from the
                    // first unrendered frame
                    self.dirty
                        .insert(TimeRange::new(self.params.frame_to_time(frame), range.end));
                    for rest in &ranges[i + 1..] {
                        self.dirty.insert(*rest);
                    }
                    cancelled = true;
                    break 'ranges;
                }

                let mut ctx = EvalContext::new(decoders)
                    .at(self.params.frame_to_time(frame))
                    .with_gfx(gfx);
                ctx.video = self.params;
                ctx.mode = self.mode;
                graph.value(viewer, "texture", &mut ctx);
                rendered += 1;
                frame += 1;
            }
        }

        if cancelled {
            self.last_frame = None;
        }
        self.finish_render();
        Ok(rendered)
    }

    /// Drop the retained frame and release per-node GPU state.
    pub fn release(&mut self, graph: &mut NodeGraph) {
        self.last_frame = None;
        graph.release_all();
    }
}
