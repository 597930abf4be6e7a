//! Message provision with local fallback.
//!
//! Picks a prompt variant at random (repeated identical phrasing gets old
//! fast), asks the generation client, and degrades to a fixed per-kind
//! fallback on any failure or empty reply. `provide` never fails.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generation::TextGenerationClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Focus,
    Distraction,
}

pub const FOCUS_FALLBACK: &str = "You're capable of amazing things. Stay focused!";
pub const DISTRACTION_FALLBACK: &str = "Back to scrolling instead of growing? Classic.";

const FOCUS_ROLE: &str = "You're a helpful assistant who gives short motivational quotes.";
const DISTRACTION_ROLE: &str = "You're a helpful assistant who gives short, funny roasts.";

const FOCUS_PROMPTS: &[&str] = &[
    "Give a short motivational quote to help someone stay focused. Under 20 words. Be creative.",
    "Write one encouraging line for someone deep in focused work. Under 20 words.",
    "Give a fresh, punchy quote about deep work and concentration. Under 20 words.",
];

const DISTRACTION_PROMPTS: &[&str] = &[
    "Give a short, sarcastic roast for someone who can't stop scrolling. Keep it under 20 words. Be funny.",
    "Write one witty jab at someone who just opened a social media app instead of working. Under 20 words.",
    "Roast a serial procrastinator who got distracted again. One sentence, under 20 words.",
];

/// Produces a short message for a classification, preferring the remote
/// generation call and falling back to fixed local text.
pub struct MessageProvider {
    client: Arc<dyn TextGenerationClient>,
}

impl MessageProvider {
    pub fn new(client: Arc<dyn TextGenerationClient>) -> Self {
        Self { client }
    }

    /// The deterministic local fallback for a kind.
    pub fn fallback(kind: MessageKind) -> &'static str {
        match kind {
            MessageKind::Focus => FOCUS_FALLBACK,
            MessageKind::Distraction => DISTRACTION_FALLBACK,
        }
    }

    /// Produce a message for the given kind. Generation failures and empty
    /// replies degrade to [`fallback`](Self::fallback); this never fails.
    pub async fn provide(&self, kind: MessageKind) -> String {
        let role = match kind {
            MessageKind::Focus => FOCUS_ROLE,
            MessageKind::Distraction => DISTRACTION_ROLE,
        };
        match self.client.generate(role, pick_prompt(kind)).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Self::fallback(kind).to_string()
                } else {
                    text.to_string()
                }
            }
            Err(e) => {
                debug!(error = %e, ?kind, "generation failed, using fallback");
                Self::fallback(kind).to_string()
            }
        }
    }
}

fn pick_prompt(kind: MessageKind) -> &'static str {
    let options = match kind {
        MessageKind::Focus => FOCUS_PROMPTS,
        MessageKind::Distraction => DISTRACTION_PROMPTS,
    };
    options[rand::thread_rng().gen_range(0..options.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use async_trait::async_trait;

    struct FixedClient(Result<&'static str, fn() -> GenerationError>);

    #[async_trait]
    impl TextGenerationClient for FixedClient {
        async fn generate(
            &self,
            _system_role: &str,
            _prompt: &str,
        ) -> Result<String, GenerationError> {
            match &self.0 {
                Ok(s) => Ok(s.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    fn provider(result: Result<&'static str, fn() -> GenerationError>) -> MessageProvider {
        MessageProvider::new(Arc::new(FixedClient(result)))
    }

    #[tokio::test]
    async fn success_is_trimmed_and_returned() {
        let p = provider(Ok("  Eyes on the prize.  "));
        assert_eq!(p.provide(MessageKind::Focus).await, "Eyes on the prize.");
    }

    #[tokio::test]
    async fn whitespace_reply_falls_back() {
        let p = provider(Ok("   "));
        assert_eq!(p.provide(MessageKind::Distraction).await, DISTRACTION_FALLBACK);
    }

    #[tokio::test]
    async fn every_error_kind_falls_back() {
        let cases: Vec<fn() -> GenerationError> = vec![
            || GenerationError::Http { status: 503 },
            || GenerationError::Parse("bad shape".into()),
            || GenerationError::EmptyResponse,
        ];
        for make in cases {
            let p = provider(Err(make));
            assert_eq!(p.provide(MessageKind::Focus).await, FOCUS_FALLBACK);
            let p = provider(Err(make));
            assert_eq!(p.provide(MessageKind::Distraction).await, DISTRACTION_FALLBACK);
        }
    }
}
