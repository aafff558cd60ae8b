//! Value types wrapping a raw JSON payload with a stable accessor surface.
//!
//! TV firmware payloads aren't a versioned, documented schema the way a
//! REST API's are — fields come and go across webOS releases — so these
//! wrap [`serde_json::Value`] rather than deriving a struct that would
//! break the moment an unexpected field shows up.

mod application;
mod audio_output_source;
mod input_source;

pub use application::Application;
pub use audio_output_source::AudioOutputSource;
pub use input_source::InputSource;
