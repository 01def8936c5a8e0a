use crate::error::GenerationError;
use async_trait::async_trait;
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use serde::Serialize;
use serde_json::{json, Value};

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}

/// One prompt exchange with the model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Schema the reply must follow; sent as a structured-output response format.
    pub response_schema: Option<Value>,
}

/// Anything that can answer a prompt with text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}

#[derive(Debug)]
pub struct OpenRouterClient {
    client: openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    config: ModelConfig,
}

impl OpenRouterClient {
    /// Reads `OPENROUTER_API_KEY` from the environment.
    pub fn new(config: ModelConfig) -> Result<Self, GenerationError> {
        let client = openrouter_api::OpenRouterClient::quick()
            .map_err(|e| GenerationError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

/// Chat request for one exchange. A response schema becomes a `json_schema`
/// response format.
pub fn build_request(
    config: &ModelConfig,
    request: &CompletionRequest,
) -> Result<ChatCompletionRequest, GenerationError> {
    let messages = vec![
        Message::text("system", &request.system),
        Message::text("user", &request.prompt),
    ];

    let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

    let completion = ChatCompletionRequest {
        model: config.model.clone(),
        messages,
        provider: Some(provider),
        stream: None,
        response_format: None,
        tools: None,
        tool_choice: None,
        models: None,
        transforms: None,
        route: None,
        user: None,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: None,
        top_k: None,
        frequency_penalty: None,
        presence_penalty: None,
        repetition_penalty: None,
        min_p: None,
        top_a: None,
        seed: None,
        stop: None,
        logit_bias: None,
        logprobs: None,
        top_logprobs: None,
        prediction: None,
        parallel_tool_calls: None,
        verbosity: None,
    };

    let Some(schema) = &request.response_schema else {
        return Ok(completion);
    };
    let mut body = serde_json::to_value(&completion)?;
    body["response_format"] = json!({
        "type": "json_schema",
        "json_schema": {
            "name": "quiz",
            "strict": false,
            "schema": schema
        }
    });
    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl LlmProvider for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let completion = build_request(&self.config, request)?;

        tracing::debug!(
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            structured = request.response_schema.is_some(),
            "sending completion request"
        );

        let response = self
            .client
            .chat()
            .map_err(|e| GenerationError::Client(e.to_string()))?
            .chat_completion(completion)
            .await
            .map_err(|e| GenerationError::Provider(e.to_string()))?;

        let Some(choice) = response.choices.first() else {
            return Err(GenerationError::EmptyResponse);
        };

        let text = match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => text.clone(),
            openrouter_api::MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| {
                    if let openrouter_api::ContentPart::Text(tc) = p {
                        Some(tc.text.clone())
                    } else {
                        None
                    }
                })
                .collect::<Vec<String>>()
                .join("\n"),
        };

        tracing::debug!(response_len = text.len(), "completion received");
        Ok(text)
    }
}
