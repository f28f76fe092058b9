//! Integration test crate for NodeCut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple nodecut crates to verify they work together.

#[cfg(test)]
mod color;

#[cfg(test)]
mod graph;

#[cfg(test)]
mod render;
