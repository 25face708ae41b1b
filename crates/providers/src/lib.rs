//! Boundary to the generative-AI service.
//!
//! [`gateway::EcoGateway`] is the typed surface the rest of the workspace
//! talks to; [`gemini::GeminiClient`] is the HTTP transport behind it.

pub mod gateway;
pub mod gemini;
pub mod prompts;
pub mod schemas;
pub mod sse;

#[cfg(test)]
mod test_support;

pub use gateway::{EcoGateway, GeminiGateway};
