/*!
 * Provider implementations for generative-model services.
 *
 * This module contains client implementations for:
 * - Gemini: Google Generative Language API (document + instruction in one request)
 * - Mock: canned responses for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all generative-model providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the metadata generator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted text
    fn extract_text(response: &Self::Response) -> String;
}

/// One instruction plus one inline document
#[derive(Debug, Clone)]
pub struct DocumentPrompt {
    // @field: Natural-language instruction
    pub instruction: String,
    // @field: Raw document bytes, sent inline
    pub document: Vec<u8>,
    // @field: MIME type of the document
    pub mime_type: String,
}

impl DocumentPrompt {
    pub fn new(instruction: impl Into<String>, document: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            document,
            mime_type: mime_type.into(),
        }
    }

    /// Prompt carrying a PDF document
    pub fn pdf(instruction: impl Into<String>, document: Vec<u8>) -> Self {
        Self::new(instruction, document, "application/pdf")
    }
}

pub mod gemini;
pub mod mock;
