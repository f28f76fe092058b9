//! The node capability set and the evaluation context.

use crate::param::{ParamSpec, ParamValue};
use nodecut_color::ColorConfig;
use nodecut_core::{AudioParams, RationalTime, RenderMode, VideoParams};
use nodecut_gpu::GraphicsContext;
use nodecut_media::DecoderRegistry;
use std::collections::HashMap;

/// Static description of a node implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    /// Reverse-DNS style identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Catalog category.
    pub category: &'static str,
}

/// The active render context, threaded explicitly through every
/// evaluation call. There is no ambient current-instance lookup.
pub struct EvalContext<'a> {
    /// Time coordinate being evaluated.
    pub time: RationalTime,
    /// Execution strategy (accuracy vs. throughput).
    pub mode: RenderMode,
    /// Target frame layout of the renderer, not of any source.
    pub video: VideoParams,
    /// Target sample layout of the renderer.
    pub audio: AudioParams,
    /// Duration of audio requested starting at `time`.
    pub audio_span: RationalTime,
    /// Project color configuration.
    pub color: ColorConfig,
    /// Graphics context, when a GPU is available. Texture-producing
    /// nodes yield empty without one.
    pub gfx: Option<&'a GraphicsContext>,
    /// Decoder factories available to media nodes.
    pub decoders: &'a DecoderRegistry,
}

impl<'a> EvalContext<'a> {
    /// Create a context with default parameters and no graphics context.
    pub fn new(decoders: &'a DecoderRegistry) -> Self {
        Self {
            time: RationalTime::ZERO,
            mode: RenderMode::Online,
            video: VideoParams::default(),
            audio: AudioParams::default(),
            audio_span: RationalTime::ZERO,
            color: ColorConfig::default(),
            gfx: None,
            decoders,
        }
    }

    /// Set the evaluation time, returning self for chaining.
    pub fn at(mut self, time: RationalTime) -> Self {
        self.time = time;
        self
    }

    /// Attach a graphics context.
    pub fn with_gfx(mut self, gfx: &'a GraphicsContext) -> Self {
        self.gfx = Some(gfx);
        self
    }
}

/// Input values resolved for one evaluation call.
#[derive(Debug, Default)]
pub struct ResolvedInputs {
    values: HashMap<&'static str, ParamValue>,
}

impl ResolvedInputs {
    /// Empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolved value under an input key.
    pub fn insert(&mut self, key: &'static str, value: ParamValue) {
        self.values.insert(key, value);
    }

    /// Fetch an input value; unresolved inputs read as `Empty`.
    pub fn get(&self, key: &str) -> &ParamValue {
        static EMPTY: ParamValue = ParamValue::Empty;
        self.values.get(key).unwrap_or(&EMPTY)
    }
}

/// A unit in the compositing graph.
///
/// A node's output at a time is a pure function of its resolved inputs at
/// that time; any internal state (decoders, textures) is cache only.
/// Evaluation must not fail: every unresolvable dependency degrades to
/// `ParamValue::Empty`.
pub trait Node: Send {
    /// Static description.
    fn info(&self) -> NodeInfo;

    /// Input slots.
    fn inputs(&self) -> &[ParamSpec];

    /// Output slots.
    fn outputs(&self) -> &[ParamSpec];

    /// Produce the value of `output` from the resolved inputs.
    fn evaluate(
        &mut self,
        output: &str,
        inputs: &ResolvedInputs,
        ctx: &mut EvalContext<'_>,
    ) -> ParamValue;

    /// Drop GPU and decoder resources. Called on removal and on renderer
    /// teardown; must be safe to call more than once.
    fn release_resources(&mut self) {}
}
