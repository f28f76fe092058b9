//! Viewer output node.

use crate::node::{EvalContext, Node, NodeInfo, ResolvedInputs};
use crate::param::{ParamKind, ParamSpec, ParamValue};

const INPUTS: &[ParamSpec] = &[
    ParamSpec::new("texture", ParamKind::Texture),
    ParamSpec::new("samples", ParamKind::Samples),
];
const OUTPUTS: &[ParamSpec] = &[
    ParamSpec::new("texture", ParamKind::Texture),
    ParamSpec::new("samples", ParamKind::Samples),
];

/// Terminal node the render backends pull from. Passes its texture and
/// sample inputs straight through.
#[derive(Default)]
pub struct ViewerOutput;

impl ViewerOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Node for ViewerOutput {
    fn info(&self) -> NodeInfo {
        NodeInfo {
            id: "org.nodecut.viewer",
            name: "Viewer",
            category: "Output",
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
        _ctx: &mut EvalContext<'_>,
    ) -> ParamValue {
        match output {
            "texture" | "samples" => inputs.get(output).clone(),
            _ => ParamValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodecut_media::DecoderRegistry;

    #[test]
    fn test_passthrough() {
        let registry = DecoderRegistry::with_defaults();
        let mut ctx = EvalContext::new(&registry);
        let mut node = ViewerOutput::new();

        let mut inputs = ResolvedInputs::new();
        inputs.insert("samples", ParamValue::Float(0.0));
        // Unknown outputs read as empty
        assert!(node.evaluate("matte", &inputs, &mut ctx).is_empty());
        // Unconnected texture input reads as empty
        assert!(node.evaluate("texture", &inputs, &mut ctx).is_empty());
    }
}
