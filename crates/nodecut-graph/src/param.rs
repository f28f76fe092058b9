//! Typed node parameters.
//!
//! Parameter kinds form a closed set so connection compatibility is checked
//! at graph-edit time, not discovered during evaluation.

use nodecut_core::{RationalTime, SampleBuffer};
use nodecut_gpu::RenderTexture;
use nodecut_media::Footage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Data type tag for a node parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Texture,
    Matrix,
    Footage,
    Samples,
    Rational,
    Float,
}

impl ParamKind {
    /// Whether a value of this kind may feed an input of `other`.
    ///
    /// Kinds must match exactly except for the one explicit conversion,
    /// Rational → Float.
    pub fn can_convert_to(self, other: ParamKind) -> bool {
        self == other || (self == Self::Rational && other == Self::Float)
    }
}

/// Descriptor for one input or output slot on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Stable key naming the slot.
    pub key: &'static str,
    /// Data type of the slot.
    pub kind: ParamKind,
}

impl ParamSpec {
    /// Create a parameter descriptor.
    pub const fn new(key: &'static str, kind: ParamKind) -> Self {
        Self { key, kind }
    }
}

/// A resolved parameter value.
///
/// `Empty` is the defined result of every failure inside evaluation:
/// unconnected inputs, missing footage, decoder misses. It carries no kind.
#[derive(Clone, Default)]
pub enum ParamValue {
    #[default]
    Empty,
    Texture(Arc<RenderTexture>),
    Matrix(glam::Mat4),
    Footage(Arc<Footage>),
    Samples(Arc<SampleBuffer>),
    Rational(RationalTime),
    Float(f64),
}

impl ParamValue {
    /// Kind of this value, or `None` for `Empty`.
    pub fn kind(&self) -> Option<ParamKind> {
        match self {
            Self::Empty => None,
            Self::Texture(_) => Some(ParamKind::Texture),
            Self::Matrix(_) => Some(ParamKind::Matrix),
            Self::Footage(_) => Some(ParamKind::Footage),
            Self::Samples(_) => Some(ParamKind::Samples),
            Self::Rational(_) => Some(ParamKind::Rational),
            Self::Float(_) => Some(ParamKind::Float),
        }
    }

    /// Whether this is the empty value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The texture payload, if any.
    pub fn as_texture(&self) -> Option<&Arc<RenderTexture>> {
        match self {
            Self::Texture(t) => Some(t),
            _ => None,
        }
    }

    /// The matrix payload, if any.
    pub fn as_matrix(&self) -> Option<glam::Mat4> {
        match self {
            Self::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    /// The footage payload, if any.
    pub fn as_footage(&self) -> Option<&Arc<Footage>> {
        match self {
            Self::Footage(f) => Some(f),
            _ => None,
        }
    }

    /// The sample payload, if any.
    pub fn as_samples(&self) -> Option<&Arc<SampleBuffer>> {
        match self {
            Self::Samples(s) => Some(s),
            _ => None,
        }
    }

    /// The float payload; rationals convert implicitly.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Rational(r) => Some(r.to_seconds_f64()),
            _ => None,
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Texture(t) => write!(f, "Texture({}x{})", t.width(), t.height()),
            Self::Matrix(m) => write!(f, "Matrix({:?})", m),
            Self::Footage(v) => write!(f, "Footage({})", v.id),
            Self::Samples(s) => write!(f, "Samples({} frames)", s.frame_count()),
            Self::Rational(r) => write!(f, "Rational({})", r),
            Self::Float(v) => write!(f, "Float({})", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        assert!(ParamKind::Texture.can_convert_to(ParamKind::Texture));
        assert!(ParamKind::Rational.can_convert_to(ParamKind::Float));
        assert!(!ParamKind::Float.can_convert_to(ParamKind::Rational));
        assert!(!ParamKind::Texture.can_convert_to(ParamKind::Samples));
    }

    #[test]
    fn test_empty_has_no_kind() {
        assert_eq!(ParamValue::Empty.kind(), None);
        assert!(ParamValue::Empty.is_empty());
    }

    #[test]
    fn test_rational_reads_as_float() {
        let v = ParamValue::Rational(RationalTime::new(1, 2));
        assert_eq!(v.as_float(), Some(0.5));
    }
}
