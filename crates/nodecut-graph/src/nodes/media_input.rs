//! Video footage input node.

use crate::node::{EvalContext, Node, NodeInfo, ResolvedInputs};
use crate::param::{ParamKind, ParamSpec, ParamValue};
use nodecut_color::{ColorConfig, ColorService};
use nodecut_core::{PixelFormat, RenderMode};
use nodecut_gpu::{BlitParams, BlitPipeline, GpuTexture, RenderTexture};
use nodecut_media::{Decoder, StreamKind};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const INPUTS: &[ParamSpec] = &[
    ParamSpec::new("footage", ParamKind::Footage),
    ParamSpec::new("transform", ParamKind::Matrix),
];
const OUTPUTS: &[ParamSpec] = &[ParamSpec::new("texture", ParamKind::Texture)];

/// Produces the video stream of its footage input as a texture sized to
/// the render target.
///
/// Decoder, upload texture, output texture, blit pipeline, and color
/// service are all cache: created lazily on first use, recreated when the
/// footage, frame layout, or render parameters they were built for change,
/// and dropped by `release_resources`. Evaluation output depends only on
/// the inputs and the context.
pub struct MediaInput {
    decoder: Option<Box<dyn Decoder>>,
    decoder_footage: Option<Uuid>,
    color: Option<(ColorConfig, ColorService)>,
    upload: Option<GpuTexture>,
    output: Option<Arc<RenderTexture>>,
    blit: Option<BlitPipeline>,
}

impl MediaInput {
    pub fn new() -> Self {
        Self {
            decoder: None,
            decoder_footage: None,
            color: None,
            upload: None,
            output: None,
            blit: None,
        }
    }

    fn service_for(&mut self, config: ColorConfig) -> &ColorService {
        if self.color.as_ref().map(|(c, _)| *c) != Some(config) {
            self.color = Some((
                config,
                ColorService::new(config.source, config.reference),
            ));
        }
        &self.color.as_ref().unwrap().1
    }
}

impl Default for MediaInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for MediaInput {
    fn info(&self) -> NodeInfo {
        NodeInfo {
            id: "org.nodecut.mediainput",
            name: "Media",
            category: "Input",
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
        let gfx = match ctx.gfx {
            Some(gfx) => gfx,
            None => return ParamValue::Empty,
        };
        let footage = match inputs.get("footage").as_footage() {
            Some(f) => Arc::clone(f),
            None => return ParamValue::Empty,
        };

        // Bind a decoder to the footage's first video stream, recreating it
        // when the footage connection changes.
        if self.decoder_footage != Some(footage.id) {
            self.decoder = None;
            self.decoder_footage = Some(footage.id);
        }
        if self.decoder.is_none() {
            let mut decoder = match ctx.decoders.create_from_id(&footage) {
                Some(d) => d,
                None => {
                    warn!(kind = %footage.decoder_kind, "no decoder for footage");
                    return ParamValue::Empty;
                }
            };
            match footage.first_stream(StreamKind::Video) {
                Some(stream) => decoder.set_stream(stream),
                None => return ParamValue::Empty,
            }
            self.decoder = Some(decoder);
        }

        let mut frame = match self.decoder.as_mut().unwrap().retrieve(ctx.time) {
            Some(frame) => frame,
            None => return ParamValue::Empty,
        };

        // Online renders do the color transform exactly on the CPU; offline
        // renders fold it into the blit shader for throughput.
        let mut blit_params = BlitParams {
            transform: inputs
                .get("transform")
                .as_matrix()
                .unwrap_or(glam::Mat4::IDENTITY),
            color: None,
            associate_alpha: false,
        };
        match ctx.mode {
            RenderMode::Online => {
                let src_format = frame.format;
                frame = match frame.convert(PixelFormat::Rgba32F) {
                    Some(frame) => frame,
                    None => {
                        warn!(format = ?src_format, "cannot convert frame for CPU color path");
                        return ParamValue::Empty;
                    }
                };
                let service = self.service_for(ctx.color);
                if let Err(err) =
                    service.convert_frame(&mut frame, nodecut_color::AlphaState::Unassociated)
                {
                    warn!(%err, "color transform failed");
                    return ParamValue::Empty;
                }
            }
            RenderMode::Offline => {
                let service = self.service_for(ctx.color);
                blit_params.color = Some(service.processor());
                blit_params.associate_alpha = true;
            }
        }

        // Upload into a reused staging texture.
        let fits = self
            .upload
            .as_ref()
            .is_some_and(|t| t.matches(frame.width, frame.height, frame.format));
        if !fits {
            if let Some(old) = self.upload.take() {
                old.destroy();
            }
            debug!(
                width = frame.width,
                height = frame.height,
                "allocating media upload texture"
            );
            self.upload = Some(GpuTexture::new(
                gfx,
                frame.width,
                frame.height,
                frame.format,
                Some("Media Upload"),
            ));
        }
        let upload = self.upload.as_ref().unwrap();
        if let Err(err) = upload.upload(gfx, &frame) {
            warn!(%err, "frame upload failed");
            return ParamValue::Empty;
        }

        // Output texture sized to the render target, not the source.
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

        if self.blit.as_ref().map(|b| b.target_format()) != Some(video.format) {
            self.blit = Some(BlitPipeline::new(gfx, video.format));
        }
        let blit = self.blit.as_ref().unwrap();

        blit.blit(gfx, upload, out.back(), &blit_params);
        out.swap();

        ParamValue::Texture(Arc::clone(out))
    }

    fn release_resources(&mut self) {
        self.decoder = None;
        self.decoder_footage = None;
        if let Some(tex) = self.upload.take() {
            tex.destroy();
        }
        if let Some(out) = self.output.take() {
            out.release();
        }
        self.blit = None;
        self.color = None;
    }
}
