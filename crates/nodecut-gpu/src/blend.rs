//! Blend mode definitions for compositing.
//!
//! The compositing shader selects the blend operation from these enums via
//! `shader_index`.

use serde::{Deserialize, Serialize};

/// Blend mode for compositing layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum BlendMode {
    #[default]
    Normal = 0,
    Add = 1,
    Multiply = 2,
    Screen = 3,
}

impl BlendMode {
    /// All blend modes in display order.
    pub const ALL: [BlendMode; 4] = [Self::Normal, Self::Add, Self::Multiply, Self::Screen];

    /// Index used by the compositing shader.
    pub fn shader_index(self) -> u32 {
        self as u32
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Add => "Add",
            Self::Multiply => "Multiply",
            Self::Screen => "Screen",
        }
    }
}
