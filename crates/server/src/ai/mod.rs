//! Department suggestion backed by the Gemini API

pub mod classifier;
pub mod client;

pub use client::GeminiClient;
