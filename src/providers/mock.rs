/*!
 * Mock provider implementations for testing and dry runs.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with a fenced metadata JSON reply
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::empty()` - Returns an empty reply
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{DocumentPrompt, Provider};

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The generated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a metadata reply
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
}

/// Mock provider for testing metadata generation
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&DocumentPrompt) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&DocumentPrompt) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far (across clones)
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// A well-formed metadata reply wrapped the way models often wrap it
    pub fn sample_metadata_reply() -> String {
        concat!(
            "Here is the metadata:\n```json\n",
            "{\n",
            "  \"aiSummary\": \"A mock summary of the chapter.\",\n",
            "  \"keyConcepts\": [ { \"term\": \"dharma\", \"definition\": \"Duty and right conduct.\" } ],\n",
            "  \"searchTags\": [ \"duty\", \"ethics\" ],\n",
            "  \"deeperInsights\": {\n",
            "    \"philosophicalViewpoint\": \"Action without attachment.\",\n",
            "    \"practicalAdvice\": [ { \"point\": \"Act without clinging to results.\" }, \"Study daily.\" ]\n",
            "  }\n",
            "}\n```\nLet me know if you need anything else."
        )
        .to_string()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = DocumentPrompt;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        let working_text = |request: &DocumentPrompt| match self.custom_response {
            Some(generator) => generator(request),
            None => Self::sample_metadata_reply(),
        };

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse { text: working_text(&request) }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse { text: working_text(&request) })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(MockResponse { text: String::new() }),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
