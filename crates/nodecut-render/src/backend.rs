//! Backend lifecycle state.

/// State machine shared by the render backends.
///
/// Parameter changes are only legal while `Stopped`; a backend moves to
/// `Rendering` for the duration of a drain and back on completion or
/// cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Stopped,
    Rendering,
}

impl RenderState {
    /// Whether a render is in flight.
    pub fn is_rendering(self) -> bool {
        self == Self::Rendering
    }
}
