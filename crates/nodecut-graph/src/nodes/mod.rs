//! The built-in node catalog.

pub mod blend;
pub mod media_audio;
pub mod media_input;
pub mod viewer;

pub use blend::BlendNode;
pub use media_audio::MediaAudio;
pub use media_input::MediaInput;
pub use viewer::ViewerOutput;
