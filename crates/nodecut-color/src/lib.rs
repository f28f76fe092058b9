//! NodeCut Color - Color management for the render pipeline
//!
//! Provides the source→reference transform service with a CPU path (exact,
//! used while online) and a GPU processor handle (fast, used offline), plus
//! explicit alpha association handling around the transform.

pub mod alpha;
pub mod color_space;
pub mod service;
pub mod transfer;

pub use alpha::{associate_alpha, unassociate_alpha, AlphaState};
pub use color_space::{convert_3x3, ColorSpace};
pub use service::{ColorConfig, ColorProcessor, ColorService};
pub use transfer::TransferFunction;
