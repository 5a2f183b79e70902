// Generative Language API (`generateContent`) client.
//
// Base path: /v1beta/models/{model}:generateContent
// Auth: x-goog-api-key header

mod client;
pub mod types;

pub use client::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GenerativeClient};
