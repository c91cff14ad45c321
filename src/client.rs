use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1:latest";

/// Generation can legitimately take minutes on large chunks with a cold model.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client abstraction over the generate endpoint (for testability).
pub trait GenerateClient {
    /// Perform one blocking generation call and return the model's raw output
    /// text. The output is expected, but not guaranteed, to be JSON.
    fn generate(&self, prompt: &str, system: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaClient {
    agent: ureq::Agent,
    base_url: String,
    model: String,
    temperature: f64,
    num_ctx: u32,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, temperature: f64, num_ctx: u32) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            base_url: base_url.to_string(),
            model: model.to_string(),
            temperature,
            num_ctx,
        }
    }

    fn payload(&self, prompt: &str, system: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "system": system,
            "stream": false,
            "format": "json",
            "options": {
                "temperature": self.temperature,
                "num_ctx": self.num_ctx,
            },
        })
    }
}

fn generate_url(base_url: &str) -> String {
    format!("{}/api/generate", base_url.trim_end_matches('/'))
}

impl GenerateClient for OllamaClient {
    fn generate(&self, prompt: &str, system: &str) -> Result<String> {
        let url = generate_url(&self.base_url);
        let body = self.payload(prompt, system);

        debug!(
            model = %self.model,
            url = %url,
            prompt_chars = prompt.chars().count(),
            "requesting generation"
        );

        match self.agent.post(&url).send_json(&body) {
            Ok(response) => {
                let envelope: GenerateResponse = response
                    .into_json()
                    .map_err(|e| Error::Model(format!("failed to decode generate response: {e}")))?;
                Ok(envelope.response)
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(Error::ModelRequest {
                    status,
                    url,
                    model: self.model.clone(),
                    body,
                })
            }
            Err(e) => Err(Error::Model(format!("request to {url} failed: {e}"))),
        }
    }
}
