/*!
 * Tests for provider implementations used through the Provider trait
 */

use gurukul::errors::ProviderError;
use gurukul::metadata::response::clean_response_text;
use gurukul::providers::gemini::Gemini;
use gurukul::providers::mock::MockProvider;
use gurukul::providers::{DocumentPrompt, Provider};

fn prompt() -> DocumentPrompt {
    DocumentPrompt::pdf("Describe this chapter", b"%PDF-1.4".to_vec())
}

async fn reply_text<P>(provider: &P) -> Result<String, ProviderError>
where
    P: Provider<Request = DocumentPrompt>,
{
    let response = provider.complete(prompt()).await?;
    Ok(P::extract_text(&response))
}

/// Test that the canned reply survives the response cleaner
#[tokio::test]
async fn test_mockProvider_sampleReply_shouldCleanToObject() {
    let provider = MockProvider::working();
    let text = reply_text(&provider).await.expect("working mock should answer");

    let cleaned = clean_response_text(&text).expect("sample reply holds an object");
    assert!(cleaned.starts_with('{') && cleaned.ends_with('}'));
    assert!(!cleaned.contains("```"));
    assert_eq!(provider.request_count(), 1);
}

/// Test the failure modes of the mock
#[tokio::test]
async fn test_mockProvider_failureModes_shouldSurfaceThroughTrait() {
    let failing = reply_text(&MockProvider::failing()).await;
    assert!(matches!(failing, Err(ProviderError::ApiError { status_code: 500, .. })));

    let empty = reply_text(&MockProvider::empty()).await.expect("empty mock still answers");
    assert!(empty.is_empty());
}

/// Test that the Gemini client never prints its key
#[test]
fn test_gemini_debug_shouldHideApiKey() {
    let client = Gemini::new("very-secret-key", "https://example.test", "gemini-2.5-pro", 30);
    let debug = format!("{:?}", client);

    assert!(debug.contains("gemini-2.5-pro"));
    assert!(!debug.contains("very-secret-key"));
    assert_eq!(client.model(), "gemini-2.5-pro");
}

/// Test that an unusable endpoint is rejected before any request
#[test]
fn test_gemini_apiUrl_withInvalidEndpoint_shouldFail() {
    let client = Gemini::new("k", "not a url", "gemini-2.5-pro", 30);
    assert!(matches!(client.api_url(), Err(ProviderError::RequestFailed(_))));

    let default = Gemini::new("k", "", "gemini-2.5-flash", 30);
    let url = default.api_url().expect("default endpoint is valid");
    assert_eq!(url.host_str(), Some("generativelanguage.googleapis.com"));
}

/// Test that an unreachable service maps to a connection error
#[tokio::test]
async fn test_gemini_complete_withUnreachableEndpoint_shouldBeConnectionError() {
    let client = Gemini::new("k", "http://127.0.0.1:9", "gemini-2.5-pro", 5);
    let result = client.complete(prompt()).await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))), "{:?}", result.err());
}

/// Test that transport errors never carry the API key
#[tokio::test]
async fn test_gemini_complete_withUnreachableEndpoint_shouldNotExposeKey() {
    let client = Gemini::new("SECRETKEY123", "http://127.0.0.1:1", "gemini-2.5-pro", 5);
    let error = client.complete(prompt()).await.expect_err("nothing listens on port 1");

    assert!(!error.to_string().contains("SECRETKEY123"), "{}", error);
    assert!(!format!("{:?}", error).contains("SECRETKEY123"));
}
