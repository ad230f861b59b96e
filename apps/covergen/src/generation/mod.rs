// Cover letter generation: markup normalization, prior-letter digest, prompt and LLM call.
// All LLM calls go through llm_client; retries are applied here via llm_client::retry.

pub mod generator;
pub mod normalizer;
pub mod prompts;
pub mod structure;
