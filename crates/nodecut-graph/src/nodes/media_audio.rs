//! Audio footage input node.

use crate::node::{EvalContext, Node, NodeInfo, ResolvedInputs};
use crate::param::{ParamKind, ParamSpec, ParamValue};
use nodecut_core::TimeRange;
use nodecut_media::{Decoder, StreamKind};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

const INPUTS: &[ParamSpec] = &[ParamSpec::new("footage", ParamKind::Footage)];
const OUTPUTS: &[ParamSpec] = &[ParamSpec::new("samples", ParamKind::Samples)];

/// Produces the audio stream of its footage input, conformed to the
/// renderer's sample parameters. The sample span pulled per evaluation is
/// `[ctx.time, ctx.time + ctx.audio_span)`.
pub struct MediaAudio {
    decoder: Option<Box<dyn Decoder>>,
    decoder_footage: Option<Uuid>,
}

impl MediaAudio {
    pub fn new() -> Self {
        Self {
            decoder: None,
            decoder_footage: None,
        }
    }
}

impl Default for MediaAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for MediaAudio {
    fn info(&self) -> NodeInfo {
        NodeInfo {
            id: "org.nodecut.mediaaudio",
            name: "Media Audio",
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
        if output != "samples" {
            return ParamValue::Empty;
        }
        let footage = match inputs.get("footage").as_footage() {
            Some(f) => Arc::clone(f),
            None => return ParamValue::Empty,
        };

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
            match footage.first_stream(StreamKind::Audio) {
                Some(stream) => decoder.set_stream(stream),
                None => return ParamValue::Empty,
            }
            self.decoder = Some(decoder);
        }

        let range = TimeRange::from_start_duration(ctx.time, ctx.audio_span);
        match self
            .decoder
            .as_mut()
            .unwrap()
            .retrieve_samples(range, &ctx.audio)
        {
            Some(buf) => ParamValue::Samples(Arc::new(buf)),
            None => ParamValue::Empty,
        }
    }

    fn release_resources(&mut self) {
        self.decoder = None;
        self.decoder_footage = None;
    }
}
