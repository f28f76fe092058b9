//! Transfer functions (OETF/EOTF).
#![allow(clippy::excessive_precision)]

use serde::{Deserialize, Serialize};

/// Transfer function type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransferFunction {
    SRGB,
    Rec709,
    Linear,
    Gamma(f32),
}

impl TransferFunction {
    /// Convert from non-linear (display/encoded) to linear light.
    pub fn to_linear(&self, v: f32) -> f32 {
        match self {
            Self::Linear => v,
            Self::SRGB => {
                if v <= 0.04045 {
                    v / 12.92
                } else {
                    ((v + 0.055) / 1.055).powf(2.4)
                }
            }
            Self::Rec709 => {
                if v < 0.081 {
                    v / 4.5
                } else {
                    ((v + 0.099) / 1.099).powf(1.0 / 0.45)
                }
            }
            Self::Gamma(g) => {
                if v <= 0.0 {
                    0.0
                } else {
                    v.powf(*g)
                }
            }
        }
    }

    /// Convert from linear light to non-linear (display/encoded).
    pub fn from_linear(&self, v: f32) -> f32 {
        match self {
            Self::Linear => v,
            Self::SRGB => {
                if v <= 0.0031308 {
                    v * 12.92
                } else {
                    1.055 * v.powf(1.0 / 2.4) - 0.055
                }
            }
            Self::Rec709 => {
                if v < 0.018 {
                    v * 4.5
                } else {
                    1.099 * v.powf(0.45) - 0.099
                }
            }
            Self::Gamma(g) => {
                if v <= 0.0 || *g == 0.0 {
                    0.0
                } else {
                    v.powf(1.0 / *g)
                }
            }
        }
    }

    /// The transfer function a color space encodes with.
    pub fn for_space(space: &crate::ColorSpace) -> Self {
        use crate::ColorSpace;
        match space {
            ColorSpace::SRGB => Self::SRGB,
            ColorSpace::Rec709 | ColorSpace::Rec2020 => Self::Rec709,
            ColorSpace::DciP3 => Self::Gamma(2.6),
            ColorSpace::LinearSRGB | ColorSpace::ACEScg => Self::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_roundtrip() {
        let tf = TransferFunction::SRGB;
        for &v in &[0.0, 0.04, 0.1, 0.5, 0.9, 1.0] {
            let linear = tf.to_linear(v);
            let back = tf.from_linear(linear);
            assert!((back - v).abs() < 0.001, "sRGB roundtrip failed for {}", v);
        }
    }

    #[test]
    fn test_rec709_roundtrip() {
        let tf = TransferFunction::Rec709;
        for &v in &[0.0, 0.04, 0.5, 1.0] {
            let linear = tf.to_linear(v);
            let back = tf.from_linear(linear);
            assert!((back - v).abs() < 0.001, "Rec709 roundtrip failed for {}", v);
        }
    }

    #[test]
    fn test_linear_passthrough() {
        let tf = TransferFunction::Linear;
        assert_eq!(tf.to_linear(0.5), 0.5);
        assert_eq!(tf.from_linear(0.5), 0.5);
    }

    #[test]
    fn test_gamma() {
        let tf = TransferFunction::Gamma(2.2);
        let linear = tf.to_linear(0.5);
        let back = tf.from_linear(linear);
        assert!((back - 0.5).abs() < 0.001);
    }
}
