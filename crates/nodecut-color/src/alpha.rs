//! Alpha association handling.
//!
//! Color math on semi-transparent pixels must happen in unassociated
//! (straight) space; compositing relies on associated (premultiplied)
//! alpha. These helpers convert RGBA32F buffers between the two.

use serde::{Deserialize, Serialize};

/// Whether color channels are premultiplied by alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlphaState {
    /// Color channels are premultiplied by the alpha channel.
    Associated,
    /// Straight alpha.
    Unassociated,
}

/// Premultiply color channels by alpha, in place. `pixels` is interleaved
/// RGBA f32 data.
pub fn associate_alpha(pixels: &mut [f32]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3];
        px[0] *= a;
        px[1] *= a;
        px[2] *= a;
    }
}

/// Divide color channels by alpha, in place. Fully transparent pixels are
/// left untouched since their color is undefined.
pub fn unassociate_alpha(pixels: &mut [f32]) {
    for px in pixels.chunks_exact_mut(4) {
        let a = px[3];
        if a > 0.0 {
            px[0] /= a;
            px[1] /= a;
            px[2] /= a;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_associate_roundtrip() {
        let mut px = vec![0.8, 0.6, 0.4, 0.5];
        associate_alpha(&mut px);
        assert!((px[0] - 0.4).abs() < 1e-6);
        unassociate_alpha(&mut px);
        assert!((px[0] - 0.8).abs() < 1e-6);
        assert!((px[1] - 0.6).abs() < 1e-6);
        assert!((px[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_zero_alpha_is_left_alone() {
        let mut px = vec![0.8, 0.6, 0.4, 0.0];
        unassociate_alpha(&mut px);
        assert_eq!(px, vec![0.8, 0.6, 0.4, 0.0]);
    }
}
