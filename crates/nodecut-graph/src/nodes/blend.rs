//! Two-input blend node.

use crate::node::{EvalContext, Node, NodeInfo, ResolvedInputs};
use crate::param::{ParamKind, ParamSpec, ParamValue};
use nodecut_gpu::{BlendMode, CompositePipeline, RenderTexture};
use std::sync::Arc;

const INPUTS: &[ParamSpec] = &[
    ParamSpec::new("base", ParamKind::Texture),
    ParamSpec::new("blend", ParamKind::Texture),
    ParamSpec::new("opacity", ParamKind::Float),
];
const OUTPUTS: &[ParamSpec] = &[ParamSpec::new("texture", ParamKind::Texture)];

/// Merges its blend input over its base input with a selectable blend
/// mode. If only one side is connected the node passes it through without
/// touching the GPU.
pub struct BlendNode {
    mode: BlendMode,
    pipeline: Option<CompositePipeline>,
    output: Option<Arc<RenderTexture>>,
}

impl BlendNode {
    pub fn new(mode: BlendMode) -> Self {
        Self {
            mode,
            pipeline: None,
            output: None,
        }
    }

    /// Blend operation applied when both inputs are present.
    pub fn mode(&self) -> BlendMode {
        self.mode
    }

    /// Change the blend operation.
    pub fn set_mode(&mut self, mode: BlendMode) {
        self.mode = mode;
    }
}

impl Default for BlendNode {
    fn default() -> Self {
        Self::new(BlendMode::Normal)
    }
}

impl Node for BlendNode {
    fn info(&self) -> NodeInfo {
        NodeInfo {
            id: "org.nodecut.blend",
            name: "Blend",
            category: "Composite",
        }
    }

    fn inputs(&self) -> &[ParamSpec] {
        INPUTS
    }

    fn outputs(&self) -> &[ParamSpec] {
        OUTPUTS
    }

    fn evaluate(
        &mut self,
        output: &str,
        inputs: &ResolvedInputs,
        ctx: &mut EvalContext<'_>,
    ) -> ParamValue {
        if output != "texture" {
            return ParamValue::Empty;
        }

        let base = inputs.get("base").as_texture();
        let blend = inputs.get("blend").as_texture();
        let (base, blend) = match (base, blend) {
            (Some(base), Some(blend)) => (base, blend),
            (Some(only), None) | (None, Some(only)) => {
                return ParamValue::Texture(Arc::clone(only));
            }
            (None, None) => return ParamValue::Empty,
        };

        let gfx = match ctx.gfx {
            Some(gfx) => gfx,
            None => return ParamValue::Empty,
        };
        let opacity = inputs.get("opacity").as_float().unwrap_or(1.0) as f32;

        let video = ctx.video;
        let fits = self
            .output
            .as_ref()
            .is_some_and(|t| t.matches(video.width, video.height, video.format));
        if !fits {
            if let Some(old) = self.output.take() {
                old.release();
            }
            self.output = Some(Arc::new(RenderTexture::new(
                gfx,
                video.width,
                video.height,
                video.format,
            )));
        }
        let out = self.output.as_ref().unwrap();

        if self.pipeline.as_ref().map(|p| p.target_format()) != Some(video.format) {
            self.pipeline = Some(CompositePipeline::new(gfx, video.format));
        }
        let pipeline = self.pipeline.as_ref().unwrap();

        pipeline.composite(gfx, base.front(), blend.front(), out.back(), self.mode, opacity);
        out.swap();

        ParamValue::Texture(Arc::clone(out))
    }

    fn release_resources(&mut self) {
        self.pipeline = None;
        if let Some(out) = self.output.take() {
            out.release();
        }
    }
}
