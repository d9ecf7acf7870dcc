use crate::tokenizer::normalize_whitespace;
use crate::traits::EnrichmentSource;
use crate::{EnrichmentError, EnrichmentOptions, EnrichmentResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

const BACKEND: &str = "openfda";

/// openFDA drug label lookup. One GET per call, bounded by the client timeout.
pub struct OpenFdaClient {
    client: Client,
    label_url: Url,
}

impl OpenFdaClient {
    pub fn new(options: &EnrichmentOptions) -> Result<Self, EnrichmentError> {
        let mut base = Url::parse(&options.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: Client::builder().timeout(options.timeout).build()?,
            label_url: base.join("drug/label.json")?,
        })
    }

    pub fn label_url(&self) -> &Url {
        &self.label_url
    }

    pub async fn fetch_label(&self, name: &str) -> Result<EnrichmentResult, EnrichmentError> {
        let term =
            search_term(name).ok_or_else(|| EnrichmentError::NoMatch(name.to_string()))?;

        let response = self
            .client
            .get(self.label_url.clone())
            .query(&[("search", term.as_str()), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichmentError::BackendResponse {
                backend: BACKEND.to_string(),
                details: response.status().to_string(),
            });
        }

        let payload: Value = response.json().await?;
        let label = payload
            .pointer("/results/0")
            .ok_or_else(|| EnrichmentError::NoMatch(name.to_string()))?;

        let result = EnrichmentResult {
            indications: first_text(label, "indications_and_usage"),
            adverse_reactions: first_text(label, "adverse_reactions"),
            warnings: first_text(label, "warnings"),
        };

        if result.is_absent() {
            return Err(EnrichmentError::EmptyPayload(name.to_string()));
        }
        Ok(result)
    }
}

#[async_trait]
impl EnrichmentSource for OpenFdaClient {
    async fn fetch(&self, name: &str) -> EnrichmentResult {
        match self.fetch_label(name).await {
            Ok(result) => result,
            Err(error) => {
                debug!(name = %name, error = %error, "openfda enrichment unavailable");
                EnrichmentResult::absent()
            }
        }
    }
}

/// openFDA is searched by the first word of the product name.
fn search_term(name: &str) -> Option<String> {
    name.split_whitespace()
        .next()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
}

fn first_text(label: &Value, field: &str) -> Option<String> {
    label
        .get(field)
        .and_then(Value::as_array)
        .and_then(|values| values.first())
        .and_then(Value::as_str)
        .map(normalize_whitespace)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::net::TcpListener;
    use std::time::Duration;

    fn options_for(base_url: String) -> EnrichmentOptions {
        EnrichmentOptions {
            base_url,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn search_term_is_first_word_lowercased() {
        assert_eq!(search_term("Augmentin 625 Duo"), Some("augmentin".to_string()));
        assert_eq!(search_term("  (Crocin) Advance"), Some("crocin".to_string()));
        assert_eq!(search_term("   "), None);
    }

    #[test]
    fn label_url_keeps_base_path() {
        let client = OpenFdaClient::new(&options_for("http://localhost:9000/fda".to_string()))
            .expect("client should build");
        assert_eq!(
            client.label_url().as_str(),
            "http://localhost:9000/fda/drug/label.json"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let error = OpenFdaClient::new(&options_for("not a url".to_string()))
            .err()
            .expect("invalid url should fail");
        assert!(matches!(error, EnrichmentError::Url(_)));
    }

    #[tokio::test]
    async fn label_fields_are_extracted() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/drug/label.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".into(), "augmentin".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "results": [{
                        "indications_and_usage": ["Treats   bacterial infections."],
                        "adverse_reactions": ["Diarrhea, nausea."],
                        "warnings": []
                    }]
                }"#,
            )
            .create_async()
            .await;

        let client = OpenFdaClient::new(&options_for(server.url())).unwrap();
        let result = client.fetch("Augmentin 625 Duo").await;

        assert_eq!(
            result.indications.as_deref(),
            Some("Treats bacterial infections.")
        );
        assert_eq!(result.adverse_reactions.as_deref(), Some("Diarrhea, nausea."));
        assert_eq!(result.warnings, None);
    }

    #[tokio::test]
    async fn not_found_response_is_absent() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/drug/label.json")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": {"code": "NOT_FOUND"}}"#)
            .create_async()
            .await;

        let client = OpenFdaClient::new(&options_for(server.url())).unwrap();
        let error = client.fetch_label("Pantocid 40").await.unwrap_err();
        assert!(matches!(error, EnrichmentError::BackendResponse { .. }));
        assert!(client.fetch("Pantocid 40").await.is_absent());
    }

    #[tokio::test]
    async fn empty_result_set_is_absent() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/drug/label.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": []}"#)
            .create_async()
            .await;

        let client = OpenFdaClient::new(&options_for(server.url())).unwrap();
        let error = client.fetch_label("Crocin").await.unwrap_err();
        assert!(matches!(error, EnrichmentError::NoMatch(_)));
    }

    #[tokio::test]
    async fn malformed_payload_is_absent() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/drug/label.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = OpenFdaClient::new(&options_for(server.url())).unwrap();
        assert!(matches!(
            client.fetch_label("Crocin").await.unwrap_err(),
            EnrichmentError::Http(_)
        ));
        assert!(client.fetch("Crocin").await.is_absent());
    }

    #[tokio::test]
    async fn label_without_text_is_absent() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/drug/label.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": [{"indications_and_usage": ["   "]}]}"#)
            .create_async()
            .await;

        let client = OpenFdaClient::new(&options_for(server.url())).unwrap();
        assert!(matches!(
            client.fetch_label("Crocin").await.unwrap_err(),
            EnrichmentError::EmptyPayload(_)
        ));
    }

    #[tokio::test]
    async fn unresponsive_server_times_out_to_absent() {
        // accepted by the kernel backlog but never answered
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        let client = OpenFdaClient::new(&EnrichmentOptions {
            base_url: format!("http://{address}"),
            timeout: Duration::from_millis(200),
        })
        .unwrap();

        let error = client.fetch_label("Augmentin").await.unwrap_err();
        match error {
            EnrichmentError::Http(inner) => assert!(inner.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(client.fetch("Augmentin").await.is_absent());
        drop(listener);
    }
}
