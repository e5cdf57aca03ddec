//! End-to-End Test Suite: repository to paper
//!
//! Drives the full stack (GitHub REST ingestion, Gemini provider, humanizer,
//! job registry and Markdown rendering) against mock HTTP servers.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mockito::{Matcher, Mock, ServerGuard};
use papergen_generation::{
    format_references, JobRegistry, PaperPipeline, PaperRequest, PipelineOptions,
    ProcessingStatus, SectionKind,
};
use papergen_github::{GitHubClient, GitHubClientConfig};
use papergen_providers::{GoogleProvider, Provider};
use serde_json::json;

const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

async fn get(server: &mut ServerGuard, path: &str, body: serde_json::Value) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

fn encoded(content: &str) -> serde_json::Value {
    json!({ "encoding": "base64", "content": STANDARD.encode(content) })
}

async fn mock_github(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        get(
            server,
            "/repos/acme/ledger",
            json!({
                "name": "ledger",
                "full_name": "acme/ledger",
                "description": "Double-entry bookkeeping service",
                "stargazers_count": 42,
                "forks_count": 7,
                "default_branch": "main",
                "license": { "name": "MIT License" }
            }),
        )
        .await,
        get(
            server,
            "/repos/acme/ledger/git/trees/main",
            json!({ "tree": [
                { "path": "app", "type": "tree" },
                { "path": "app/main.py", "type": "blob" }
            ]}),
        )
        .await,
        get(server, "/repos/acme/ledger/languages", json!({ "Python": 5000, "Shell": 200 })).await,
        get(
            server,
            "/repos/acme/ledger/commits",
            json!([{
                "sha": "f00d",
                "commit": {
                    "message": "Add journal entries",
                    "author": { "name": "Ada", "date": "2024-03-01T00:00:00Z" }
                }
            }]),
        )
        .await,
        get(server, "/repos/acme/ledger/readme", encoded("# Ledger\n\nBookkeeping as a service.")).await,
        get(
            server,
            "/repos/acme/ledger/contents/app/main.py",
            encoded("from flask import Flask\n\napp = Flask(__name__)\n\ndef post_entry():\n    return 'ok'\n"),
        )
        .await,
    ]
}

async fn mock_gemini(server: &mut ServerGuard, calls: usize) -> Mock {
    server
        .mock("POST", GEMINI_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::Regex("Repository: acme/ledger".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{
                        "text": "This paper describes a ledger. The service records journal entries."
                    }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 50, "candidatesTokenCount": 12, "totalTokenCount": 62 }
            })
            .to_string(),
        )
        .expect(calls)
        .create_async()
        .await
}

fn pipeline(github: &ServerGuard, gemini: Option<&ServerGuard>) -> PaperPipeline {
    let client = GitHubClient::new(GitHubClientConfig {
        api_base: github.url(),
        token: None,
        cache_ttl: Duration::from_secs(600),
    })
    .unwrap();
    let options = PipelineOptions {
        seed: Some(11),
        ..Default::default()
    };
    let pipeline = PaperPipeline::new(Arc::new(client)).with_options(options);
    match gemini {
        Some(server) => {
            let provider: Arc<dyn Provider> = Arc::new(
                GoogleProvider::with_base_url(
                    "test-key".to_string(),
                    format!("{}/v1beta/models", server.url()),
                )
                .unwrap(),
            );
            pipeline.with_provider(provider)
        }
        None => pipeline,
    }
}

#[tokio::test]
async fn test_repository_to_markdown_paper() {
    let mut github = mockito::Server::new_async().await;
    let github_mocks = mock_github(&mut github).await;
    let mut gemini = mockito::Server::new_async().await;
    let model = mock_gemini(&mut gemini, 8).await;

    let jobs = JobRegistry::new(Arc::new(pipeline(&github, Some(&gemini))));
    let id = jobs
        .submit(PaperRequest::new("Auditable bookkeeping").with_repository("https://github.com/acme/ledger"))
        .await;

    let status = jobs.wait(id).await.unwrap();
    assert_eq!(status.status, ProcessingStatus::Completed);

    let paper = jobs.document(id).await.unwrap();
    assert_eq!(paper.title, "ledger: Auditable bookkeeping");
    assert_eq!(paper.sections.len(), 8);
    assert!(paper.error_message.is_none());
    for section in &paper.sections {
        assert!(!section.content.trim().is_empty(), "{} is empty", section.title);
        assert!(!section.content.starts_with("Error generating"));
    }

    let markdown = paper.to_markdown();
    assert!(markdown.starts_with("# ledger: Auditable bookkeeping\n\n"));
    assert!(markdown.contains("## Literature Review"));

    model.assert_async().await;
    for mock in github_mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_snapshot_is_cached_across_jobs() {
    let mut github = mockito::Server::new_async().await;
    // Each endpoint expects exactly one hit
    let github_mocks = mock_github(&mut github).await;

    let jobs = JobRegistry::new(Arc::new(pipeline(&github, None)));
    let request = PaperRequest::new("Bookkeeping").with_repository("https://github.com/acme/ledger");
    let first = jobs.submit(request.clone()).await;
    jobs.wait(first).await.unwrap();
    let second = jobs.submit(request).await;
    jobs.wait(second).await.unwrap();

    for mock in github_mocks {
        mock.assert_async().await;
    }
    assert_eq!(jobs.list().await.len(), 2);
}

#[tokio::test]
async fn test_template_paper_references() {
    let mut github = mockito::Server::new_async().await;
    let _github_mocks = mock_github(&mut github).await;

    let paper = pipeline(&github, None)
        .generate(PaperRequest::new("Bookkeeping").with_repository("https://github.com/acme/ledger"))
        .await
        .unwrap();

    assert!(paper.section(&SectionKind::Abstract).is_some());
    assert!(paper.sections.iter().any(|s| s.title == "Code Analysis"));

    let references = format_references(&paper.references);
    assert_eq!(references.len(), 5);
    assert!(references[0].starts_with("[1] "));
    assert!(references[0].contains("https://github.com/acme/ledger"));
    assert!(references.iter().any(|r| r.contains("IEEE")));
}
