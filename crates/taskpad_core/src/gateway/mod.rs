//! Rewrite gateway: delegated text generation.
//!
//! # Responsibility
//! - Define the narrow contract the line editor and `ask` command consume.
//! - Provide the OpenAI-backed implementation and a static stand-in.
//!
//! # Invariants
//! - `rewrite` never fails; any failure is reported as `FALLBACK_SENTINEL`.
//! - One synchronous call per invocation, no retries.

mod openai;

pub use openai::{GatewayConfig, OpenAiGateway, DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Fixed text returned when no real rewrite could be produced.
pub const FALLBACK_SENTINEL: &str = "[taskpad] text generation unavailable (no API key or service error)";

/// Text-generation collaborator.
pub trait RewriteGateway {
    /// Returns generated text for `prompt`, steered by an optional
    /// `instruction`, or `FALLBACK_SENTINEL`. Empty text means the service
    /// answered with nothing.
    fn rewrite(&self, prompt: &str, instruction: Option<&str>) -> String;
}

impl<G: RewriteGateway + ?Sized> RewriteGateway for &G {
    fn rewrite(&self, prompt: &str, instruction: Option<&str>) -> String {
        (**self).rewrite(prompt, instruction)
    }
}

impl<G: RewriteGateway + ?Sized> RewriteGateway for Box<G> {
    fn rewrite(&self, prompt: &str, instruction: Option<&str>) -> String {
        (**self).rewrite(prompt, instruction)
    }
}

/// Gateway that always answers with the same text.
///
/// Used when running offline and in tests.
#[derive(Debug, Clone)]
pub struct StaticGateway {
    reply: String,
}

impl StaticGateway {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }

    /// A gateway that behaves like a service with no credential.
    pub fn unavailable() -> Self {
        Self::new(FALLBACK_SENTINEL)
    }
}

impl RewriteGateway for StaticGateway {
    fn rewrite(&self, _prompt: &str, _instruction: Option<&str>) -> String {
        self.reply.clone()
    }
}
