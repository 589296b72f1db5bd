mod input;
mod key_hints;
mod select;
mod status_bar;
mod transcript;

pub use input::TextInput;
pub use key_hints::KeyHints;
pub use select::Select;
pub use status_bar::{StatusBar, StatusLevel};
pub use transcript::{TranscriptView, wrap_text};
