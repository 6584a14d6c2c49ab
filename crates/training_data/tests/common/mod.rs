//! Shared helpers for tests that talk to a mocked completion endpoint

#![allow(dead_code)]

use serde_json::{json, Value};
use training_data::{ChatCompletionClient, TrainingDataPipeline, TrainingStore};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_AUTHORIZATION: &str = "Bearer test-api-key";
pub const TEST_MODEL: &str = "grok-beta";

/// Mock response bodies for the chat-completion endpoint
pub struct MockResponseBuilder;

impl MockResponseBuilder {
    /// Creates a chat completion response
    pub fn chat_completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1234567890,
            "model": TEST_MODEL,
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }]
        })
    }

    /// Creates an error body in the provider's format
    pub fn error(message: &str) -> Value {
        json!({ "error": message })
    }

    /// The request body the client is expected to send for `prompt`
    pub fn request_for(prompt: &str) -> Value {
        json!({
            "model": TEST_MODEL,
            "messages": [{"role": "user", "content": prompt}]
        })
    }
}

pub fn client_for(server: &MockServer) -> ChatCompletionClient {
    ChatCompletionClient::new(TEST_API_KEY)
        .with_base_url(server.uri())
        .with_model(TEST_MODEL)
}

pub fn pipeline_for(server: &MockServer) -> TrainingDataPipeline<ChatCompletionClient> {
    let store = TrainingStore::open_in_memory().expect("open store");
    TrainingDataPipeline::new(client_for(server), store)
}

/// Answer `prompt` with a 200 completion, exactly once.
pub async fn mount_completion(server: &MockServer, prompt: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", TEST_AUTHORIZATION))
        .and(body_json(MockResponseBuilder::request_for(prompt)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockResponseBuilder::chat_completion(content)),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Answer `prompt` with `status` and an error body, exactly once.
pub async fn mount_failure(server: &MockServer, prompt: &str, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_json(MockResponseBuilder::request_for(prompt)))
        .respond_with(ResponseTemplate::new(status).set_body_json(MockResponseBuilder::error(message)))
        .expect(1)
        .mount(server)
        .await;
}
