//! Classification service abstraction and the hosted-model client.
//!
//! The trait keeps the external call substitutable with a deterministic
//! stub in tests; the real client speaks the OpenAI-compatible chat
//! completions API that Groq hosts.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Request/response text completion. One call per batch.
pub trait ClassificationService {
    fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct GroqClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GroqClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Client with defaults, keyed from `GROQ_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .context("GROQ_API_KEY is not set; export it or configure [classifier] api_key")?;
        Ok(Self::new(
            api_key,
            DEFAULT_MODEL,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        ))
    }

    async fn complete_async(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            messages: Vec<Msg>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: self.model.clone(),
            messages: vec![Msg {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.0,
        };

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("build http client")?;

        let url = format!(
            "{}/openai/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let resp = client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("classification request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("classification service error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse classification response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

impl ClassificationService for GroqClient {
    /// Synchronous facade over the async call. Callers are often already
    /// inside a tokio runtime (the CLI uses `#[tokio::main]`); a nested
    /// `block_on` would panic, so bridge through the current handle when
    /// one exists.
    fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(prompt)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.complete_async(prompt))
        }
    }
}
