//! Letter Generation — turns résumé, job posting and prior letters into a new letter.
//!
//! Flow: summarize_letters → build_letter_prompt → ChatRequest →
//!       completion call wrapped in retry_with_backoff → letter text.

use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::prompts::{LETTER_PROMPT_TEMPLATE, LETTER_SYSTEM};
use crate::generation::structure::summarize_letters;
use crate::llm_client::retry::{retry_with_backoff, RetryPolicy};
use crate::llm_client::{
    ChatMessage, ChatRequest, CompletionService, LlmError, MAX_TOKENS, TEMPERATURE,
};

/// Generates cover letters through any `CompletionService`.
/// The model id and retry policy are fixed at construction.
pub struct CoverLetterGenerator<C> {
    service: C,
    model: String,
    retry: RetryPolicy,
}

impl<C: CompletionService> CoverLetterGenerator<C> {
    pub fn new(service: C, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
            retry: RetryPolicy::default(),
        }
    }

    #[cfg(test)]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Chat request for one letter: fixed system message, the prompt as user message.
    pub fn build_request(&self, prompt: String) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![ChatMessage::system(LETTER_SYSTEM), ChatMessage::user(prompt)],
        }
    }

    /// Generates a letter. Rate-limited and transient failures are retried per the
    /// configured policy; anything else fails on the first attempt.
    pub async fn generate(
        &self,
        cv_content: &str,
        job_offer: &str,
        existing_letters: &[String],
    ) -> Result<String, AppError> {
        let structure = summarize_letters(existing_letters);
        let prompt = build_letter_prompt(cv_content, job_offer, &structure);
        let request = self.build_request(prompt);

        info!(
            "Generating cover letter with {} from {} existing letters",
            self.model,
            existing_letters.len()
        );
        debug!(
            "Retry policy: {} attempts, backoff {:?}",
            self.retry.max_attempts,
            self.retry.schedule()
        );

        let service = &self.service;
        let request = &request;
        let letter = retry_with_backoff(&self.retry, LlmError::is_retryable, move |attempt| {
            debug!("Completion attempt {attempt}");
            service.complete(request)
        })
        .await?;

        info!("Cover letter generated ({} chars)", letter.chars().count());
        Ok(letter)
    }
}

/// Fills the letter template. Pure: the same inputs always yield the same prompt.
///
/// Placeholders are substituted in a single scan, so braces inside the inputs
/// are copied verbatim rather than expanded.
pub fn build_letter_prompt(cv_content: &str, job_offer: &str, structure: &str) -> String {
    let values = [
        ("{cv_content}", cv_content),
        ("{job_offer}", job_offer),
        ("{structure}", structure),
    ];

    let mut prompt = String::with_capacity(
        LETTER_PROMPT_TEMPLATE.len() + cv_content.len() + job_offer.len() + structure.len(),
    );
    let mut rest = LETTER_PROMPT_TEMPLATE;

    while let Some(pos) = rest.find('{') {
        prompt.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                prompt.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                prompt.push('{');
                rest = &tail[1..];
            }
        }
    }

    prompt.push_str(rest);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    /// Completion service that replays scripted outcomes and records every request.
    struct ScriptedService {
        outcomes: Mutex<VecDeque<Result<String, LlmError>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedService {
        fn new(outcomes: Vec<Result<String, LlmError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedService {
        async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn api(status: u16) -> LlmError {
        LlmError::Api {
            status,
            message: format!("status {status}"),
        }
    }

    fn letters() -> Vec<String> {
        vec![
            "Madame, Monsieur,\n\nJe souhaite rejoindre votre équipe.\n\nCordialement".to_string(),
        ]
    }

    #[test]
    fn test_prompt_is_pure() {
        let a = build_letter_prompt("CV", "Offre", "Structure");
        let b = build_letter_prompt("CV", "Offre", "Structure");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_prompt_contains_labeled_sections_in_order() {
        let prompt = build_letter_prompt("Ingénieur Rust", "Poste backend", "Lettre 1");
        let cv = prompt.find("CV :\nIngénieur Rust").unwrap();
        let offer = prompt.find("Offre d'emploi :\nPoste backend").unwrap();
        let structure = prompt
            .find("Structure des lettres de motivation précédentes :\nLettre 1")
            .unwrap();
        assert!(cv < offer && offer < structure);
        assert!(prompt.contains("4. Est personnalisée et convaincante"));
        assert!(!prompt.contains("{cv_content}"));
        assert!(!prompt.contains("{job_offer}"));
        assert!(!prompt.contains("{structure}"));
    }

    #[test]
    fn test_placeholders_inside_inputs_are_not_expanded() {
        let prompt = build_letter_prompt("{job_offer} et {x}", "OFFRE", "S");
        assert!(prompt.contains("CV :\n{job_offer} et {x}\n"));
        assert_eq!(prompt.matches("OFFRE").count(), 1);
    }

    #[test]
    fn test_request_uses_fixed_sampling_and_configured_model() {
        let generator = CoverLetterGenerator::new(
            ScriptedService::new(vec![]),
            "gpt-4-turbo-preview",
        );
        let request = generator.build_request("prompt".to_string());

        assert_eq!(request.model, "gpt-4-turbo-preview");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.messages[0], ChatMessage::system(LETTER_SYSTEM));
        assert_eq!(request.messages[1], ChatMessage::user("prompt"));
    }

    #[tokio::test]
    async fn test_generate_returns_service_text_and_sends_prompt() {
        let generator = CoverLetterGenerator::new(
            ScriptedService::new(vec![Ok("Lettre générée".to_string())]),
            "gpt-3.5-turbo",
        );

        let letter = generator
            .generate("Ingénieur Rust", "Poste backend", &letters())
            .await
            .unwrap();

        assert_eq!(letter, "Lettre générée");
        let requests = generator.service.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let user = &requests[0].messages[1].content;
        assert!(user.contains("Ingénieur Rust"));
        assert!(user.contains("Poste backend"));
        assert!(user.contains("- Paragraphe 2: Je souhaite rejoindre votre équipe...."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_recovers_from_rate_limits() {
        let generator = CoverLetterGenerator::new(
            ScriptedService::new(vec![
                Err(api(429)),
                Err(api(429)),
                Err(api(429)),
                Err(api(429)),
                Ok("Lettre".to_string()),
            ]),
            "gpt-3.5-turbo",
        );
        let start = Instant::now();

        let letter = generator.generate("CV", "Offre", &letters()).await.unwrap();

        assert_eq!(letter, "Lettre");
        assert_eq!(generator.service.calls(), 5);
        assert!(start.elapsed() < Duration::from_secs(61));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_gives_up_after_five_transient_errors() {
        let generator = CoverLetterGenerator::new(
            ScriptedService::new((0..6).map(|_| Err(api(503))).collect()),
            "gpt-3.5-turbo",
        );

        let err = generator.generate("CV", "Offre", &letters()).await.unwrap_err();

        assert!(matches!(err, AppError::Llm(LlmError::Api { status: 503, .. })));
        assert_eq!(generator.service.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_does_not_retry_auth_failure() {
        let generator = CoverLetterGenerator::new(
            ScriptedService::new(vec![Err(api(401)), Ok("jamais".to_string())]),
            "gpt-3.5-turbo",
        );
        let start = Instant::now();

        let err = generator.generate("CV", "Offre", &letters()).await.unwrap_err();

        assert!(matches!(err, AppError::Llm(LlmError::Api { status: 401, .. })));
        assert_eq!(generator.service.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_retry_policy_is_honoured() {
        let generator = CoverLetterGenerator::new(
            ScriptedService::new(vec![Err(api(429)), Err(api(429))]),
            "gpt-3.5-turbo",
        )
        .with_retry_policy(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(10),
        });

        assert!(generator.generate("CV", "Offre", &[]).await.is_err());
        assert_eq!(generator.service.calls(), 2);
    }
}
