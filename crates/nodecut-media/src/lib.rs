//! NodeCut Media - Footage model and decoder contract
//!
//! Decoders themselves are external collaborators; this crate defines the
//! contract they implement and the registry the graph resolves them from.

pub mod decoder;
pub mod footage;

pub use decoder::{Decoder, DecoderRegistry, PatternDecoder};
pub use footage::{Footage, Stream, StreamKind, StreamRef};
