//! HTTP secret-store client.
//!
//! Fetches secrets from a REST-style secret manager at
//! `GET {base_url}/secrets/{secret_type}/{id}`, with optional bearer
//! authentication.

use super::types::{
    SecretFetch, SecretFetchError, SecretFetchRequest, SecretResponse, SecretStoreClient,
};
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;

pub struct HttpSecretStoreClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpSecretStoreClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            api_key: None,
            client: Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    fn secret_url(&self, request: &SecretFetchRequest) -> String {
        format!(
            "{}/secrets/{}/{}",
            self.base_url.trim_end_matches('/'),
            request.secret_type,
            request.id,
        )
    }
}

impl SecretStoreClient for HttpSecretStoreClient {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_secret(&self, request: SecretFetchRequest) -> SecretFetch {
        let url = self.secret_url(&request);
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        Box::pin(async move {
            debug!(url = %url, "Fetching secret");

            let mut http_request = client.get(&url).header("Accept", "application/json");
            if let Some(key) = api_key {
                http_request = http_request.bearer_auth(key);
            }

            let response = http_request.send().await?;
            let status = response.status();
            let status_text = status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.to_string(), v.to_string()))
                })
                .collect();

            let text = response.text().await?;
            if !status.is_success() {
                return Err(SecretFetchError::Status {
                    status_code: status.as_u16(),
                    body: text,
                });
            }

            // Non-JSON payloads are carried through as plain strings.
            let body = serde_json::from_str(&text)
                .unwrap_or(serde_json::Value::String(text));

            Ok(SecretResponse {
                body,
                headers,
                status_code: status.as_u16(),
                status_text,
            })
        })
    }
}
