use super::{CompletionRequest, LlmClient, LlmResponse};
use async_trait::async_trait;

/// Offline client that answers every request with a fixed body.
#[derive(Debug, Clone)]
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
}

impl FakeClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            fixed_response: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, _request: &CompletionRequest) -> anyhow::Result<LlmResponse> {
        // An auditor with nothing to say.
        let text = self
            .fixed_response
            .clone()
            .unwrap_or_else(|| r#"{"issues": []}"#.to_string());
        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
