//! Upload modules.
//!
//! Multipart HTTP transport to the aspect classification service.

pub mod client;

pub use client::{UploadClient, UploadError};
