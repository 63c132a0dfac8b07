//! Chart modules.
//!
//! Rendering of chart series into terminal, Markdown, and JSON output.

pub mod renderer;

pub use renderer::*;
