//! The color management service.
//!
//! Wraps a source→reference transform with two execution paths: an exact
//! CPU path operating in place on RGBA32F frames, and a GPU-compatible
//! processor handle consumed by the blit pipeline for offline rendering.

use crate::alpha::{associate_alpha, unassociate_alpha, AlphaState};
use crate::color_space::{mat3_mat3, mat3_mul, ColorSpace};
use crate::transfer::TransferFunction;
use nodecut_core::{NodecutError, PixelFormat, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Project-level color configuration threaded through evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Color space footage is encoded in.
    pub source: ColorSpace,
    /// Reference (working) space the graph composites in.
    pub reference: ColorSpace,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            source: ColorSpace::SRGB,
            reference: ColorSpace::LinearSRGB,
        }
    }
}

/// GPU-shader-compatible description of a color transform.
///
/// The blit pipeline turns this into uniform data; the shader applies
/// `to_linear`, then the matrix, then `from_linear`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorProcessor {
    /// Combined source-RGB → target-RGB matrix (linear light).
    pub matrix: [[f32; 3]; 3],
    /// Decoding transfer applied before the matrix.
    pub to_linear: TransferFunction,
    /// Encoding transfer applied after the matrix.
    pub from_linear: TransferFunction,
}

/// Converts frame pixel data from a source space to a target space.
pub struct ColorService {
    source: ColorSpace,
    target: ColorSpace,
    processor: ColorProcessor,
}

impl ColorService {
    /// Create a service transforming `source` into `target`.
    pub fn new(source: ColorSpace, target: ColorSpace) -> Self {
        let matrix = if source == target {
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        } else {
            mat3_mat3(&target.from_xyz_matrix(), &source.to_xyz_matrix())
        };
        debug!(source = source.name(), target = target.name(), "color service created");
        Self {
            source,
            target,
            processor: ColorProcessor {
                matrix,
                to_linear: TransferFunction::for_space(&source),
                from_linear: TransferFunction::for_space(&target),
            },
        }
    }

    /// Source color space.
    pub fn source(&self) -> ColorSpace {
        self.source
    }

    /// Target color space.
    pub fn target(&self) -> ColorSpace {
        self.target
    }

    /// GPU-path handle for this transform.
    pub fn processor(&self) -> ColorProcessor {
        self.processor
    }

    /// Apply the transform to `frame` in place (CPU path, exact).
    ///
    /// The frame must be `Rgba32F`. Alpha is unassociated before the color
    /// math when the input carries associated alpha, and the result is
    /// always returned with **associated** alpha so downstream compositing
    /// can rely on it.
    pub fn convert_frame(
        &self,
        frame: &mut nodecut_core::Frame,
        alpha: AlphaState,
    ) -> Result<AlphaState> {
        if frame.format != PixelFormat::Rgba32F {
            return Err(NodecutError::InvalidParameter(format!(
                "CPU color transform requires Rgba32F, got {:?}",
                frame.format
            )));
        }

        let width = frame.width as usize;
        let pixels = frame
            .as_f32_mut()
            .ok_or_else(|| NodecutError::Color("frame data is not float".into()))?;

        if alpha == AlphaState::Associated {
            unassociate_alpha(pixels);
        }

        let proc = self.processor;
        pixels.par_chunks_mut(width * 4).for_each(|row| {
            for px in row.chunks_exact_mut(4) {
                let rgb = [
                    proc.to_linear.to_linear(px[0]),
                    proc.to_linear.to_linear(px[1]),
                    proc.to_linear.to_linear(px[2]),
                ];
                let rgb = mat3_mul(&proc.matrix, rgb);
                px[0] = proc.from_linear.from_linear(rgb[0]);
                px[1] = proc.from_linear.from_linear(rgb[1]);
                px[2] = proc.from_linear.from_linear(rgb[2]);
            }
        });

        associate_alpha(pixels);
        Ok(AlphaState::Associated)
    }
}
