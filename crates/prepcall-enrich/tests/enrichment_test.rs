//! Wiremock-backed tests for the enrichment providers.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prepcall_core::EnrichmentProvider;
use prepcall_enrich::{
    CompanyDataConfig, CompanyDataProvider, NewsSearchConfig, NewsSearchProvider,
};

fn company_provider(server: &MockServer, api_key: Option<&str>) -> CompanyDataProvider {
    CompanyDataProvider::new(CompanyDataConfig {
        base_url: server.uri(),
        api_key: api_key.map(String::from),
        timeout_seconds: 5,
    })
    .expect("provider construction")
}

fn news_provider(server: &MockServer, api_key: Option<&str>) -> NewsSearchProvider {
    NewsSearchProvider::new(NewsSearchConfig {
        base_url: server.uri(),
        api_key: api_key.map(String::from),
        timeout_seconds: 5,
        result_limit: 3,
    })
    .expect("provider construction")
}

// =============================================================================
// COMPANY DATA
// =============================================================================

#[tokio::test]
async fn company_lookup_formats_record_into_snippet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .and(query_param("name", "Acme Corp"))
        .and(header("Authorization", "Bearer cb-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Acme Corp",
            "domain": "acme.com",
            "description": "Rockets and anvils.",
            "category": {"industry": "Aerospace"},
            "metrics": {"employees": 1200},
            "foundedYear": 1999
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = company_provider(&server, Some("cb-key"));
    let snippet = provider.enrich("Acme Corp").await.unwrap().unwrap();
    assert!(snippet.contains("Acme Corp (acme.com)"));
    assert!(snippet.contains("Industry: Aerospace"));
    assert!(snippet.contains("Employees: 1200"));
    assert!(snippet.contains("Rockets and anvils."));
}

#[tokio::test]
async fn company_not_found_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = company_provider(&server, Some("cb-key"));
    assert!(provider.enrich("Nonexistent").await.unwrap().is_none());
}

#[tokio::test]
async fn company_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = company_provider(&server, Some("cb-key"));
    let err = provider.enrich("Acme").await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn company_provider_without_key_never_calls_out() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 the mock server, but the
    // provider must not send one at all.
    let provider = company_provider(&server, None);
    assert!(provider.enrich("Acme").await.unwrap().is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// NEWS SEARCH
// =============================================================================

#[tokio::test]
async fn news_search_formats_headlines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_news"))
        .and(query_param("q", "Acme Corp"))
        .and(query_param("api_key", "serp-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "news_results": [
                {
                    "title": "Acme raises Series C",
                    "source": {"name": "TechWire"},
                    "date": "2 days ago",
                    "snippet": "The rocket maker closed a $90M round."
                },
                {"title": "Acme ships anvil v2"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = news_provider(&server, Some("serp-key"));
    let snippet = provider.enrich("Acme Corp").await.unwrap().unwrap();
    assert!(snippet.contains("Recent news:"));
    assert!(snippet.contains("Acme raises Series C (TechWire, 2 days ago)"));
    assert!(snippet.contains("Acme ships anvil v2"));
}

#[tokio::test]
async fn news_search_with_no_results_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let provider = news_provider(&server, Some("serp-key"));
    assert!(provider.enrich("Acme").await.unwrap().is_none());
}

#[tokio::test]
async fn news_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = news_provider(&server, Some("serp-key"));
    let err = provider.enrich("Acme").await.unwrap_err();
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn news_provider_without_key_never_calls_out() {
    let server = MockServer::start().await;
    let provider = news_provider(&server, None);
    assert!(provider.enrich("Acme").await.unwrap().is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}
