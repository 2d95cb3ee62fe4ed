//! Google Gemini API client.
//!
//! Implements the `ModelClient` trait for Gemini models via the
//! Generative Language REST API.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::{api_key_from_env, GeminiConfig, API_KEY_VARS, DEFAULT_API_BASE, DEFAULT_MODEL};
