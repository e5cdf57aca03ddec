//! Shared fixtures: a scripted model provider and a mock GitHub API

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mockito::{Matcher, Mock, ServerGuard};
use papergen_github::{GitHubClient, GitHubClientConfig};
use papergen_providers::{
    ChatRequest, ChatResponse, FinishReason, ModelInfo, Provider, ProviderError, TokenUsage,
};
use serde_json::json;

/// Answers every request with a canned paragraph, failing sections on demand
#[derive(Default)]
pub struct ScriptedProvider {
    pub requests: Mutex<Vec<ChatRequest>>,
    /// Section titles (as they appear in the prompt) that fail
    pub failing: Vec<String>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(sections: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            failing: sections.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.messages.last().unwrap().content.clone())
            .collect()
    }
}

pub const SCRIPTED_REPLY: &str =
    "This paper shows an important method. The result is different from prior work.\n\n\
     We use the approach to create better tools. It is important to note that the problem has a solution.";

#[async_trait]
impl Provider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    fn models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "scripted-1".to_string(),
            name: "Scripted".to_string(),
            provider: "scripted".to_string(),
            context_window: 8192,
        }]
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let user = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.requests.lock().unwrap().push(request.clone());

        if self
            .failing
            .iter()
            .any(|s| user.starts_with(&format!("Write the {} section", s)))
        {
            return Err(ProviderError::RateLimited(60));
        }

        Ok(ChatResponse {
            content: SCRIPTED_REPLY.to_string(),
            model: request.model,
            usage: TokenUsage::default(),
            finish_reason: FinishReason::Stop,
        })
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

pub fn github_for(server: &ServerGuard) -> Arc<GitHubClient> {
    Arc::new(
        GitHubClient::new(GitHubClientConfig {
            api_base: server.url(),
            ..Default::default()
        })
        .unwrap(),
    )
}

pub fn encoded(content: &str) -> serde_json::Value {
    json!({ "encoding": "base64", "content": STANDARD.encode(content) })
}

pub async fn mock_json(
    server: &mut ServerGuard,
    path: &str,
    status: usize,
    body: serde_json::Value,
) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Mocks for a small Python repository at `octo/demo`
pub async fn mock_demo_repo(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        mock_json(
            server,
            "/repos/octo/demo",
            200,
            json!({
                "name": "demo",
                "full_name": "octo/demo",
                "description": "A demo project",
                "stargazers_count": 12,
                "forks_count": 3,
                "default_branch": "main"
            }),
        )
        .await,
        mock_json(
            server,
            "/repos/octo/demo/git/trees/main",
            200,
            json!({ "tree": [
                { "path": "src", "type": "tree" },
                { "path": "src/service.py", "type": "blob" }
            ]}),
        )
        .await,
        mock_json(server, "/repos/octo/demo/languages", 200, json!({ "Python": 1200 })).await,
        mock_json(
            server,
            "/repos/octo/demo/commits",
            200,
            json!([{
                "sha": "abc123",
                "commit": {
                    "message": "Initial commit",
                    "author": { "name": "Octo Cat", "date": "2024-01-01T00:00:00Z" }
                }
            }]),
        )
        .await,
        mock_json(server, "/repos/octo/demo/readme", 200, encoded("# Demo\n\nA demo project.")).await,
        mock_json(
            server,
            "/repos/octo/demo/contents/src/service.py",
            200,
            encoded("import flask\n\nclass Service:\n    def run(self):\n        return 1\n"),
        )
        .await,
    ]
}
