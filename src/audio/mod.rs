//! Audio modules.
//!
//! Microphone capture and WAV encoding for the audio upload flow.

pub mod recorder;

pub use recorder::{Recorder, RecorderState};
