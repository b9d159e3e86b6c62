//! Supabase PostgREST HTTP client.

use crate::error::SupabaseError;
use crate::types::{PostgrestError, UNIQUE_VIOLATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for a Supabase project's REST endpoint.
///
/// The anon key is stored using `SecretString` so it never shows up in logs.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl SupabaseClient {
    /// Create a new client for `base_url` (e.g. `https://xyz.supabase.co`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            // PostgREST paths are appended to the project URL
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the REST endpoint answers.
    pub async fn health_check(&self) -> bool {
        self.authorized(self.client.get(format!("{}/rest/v1/", self.base_url)))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Select rows from `table` with PostgREST query parameters.
    #[instrument(skip(self, query))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;

        let rows: Vec<T> = self.handle_response(response).await?;
        debug!("Selected {} rows", rows.len());
        Ok(rows)
    }

    /// Insert one row into `table` and return the stored representation.
    #[instrument(skip(self, row))]
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            // Ask PostgREST to echo the stored row (ids, timestamps)
            .header("Prefer", "return=representation")
            // Bulk insert format with a single element
            .json(&[row])
            .send()
            .await?;

        let rows: Vec<T> = self.handle_response(response).await?;
        rows.into_iter().next().ok_or(SupabaseError::EmptyResponse)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        request
            .header("apikey", key.as_str())
            .header("Authorization", format!("Bearer {}", key))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SupabaseError> {
        if response.status().is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(SupabaseError::from)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Map a failed response to an error, recognizing unique violations.
    async fn extract_error(&self, response: reqwest::Response) -> SupabaseError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Supabase rejected the API key");
            return SupabaseError::Unauthorized;
        }

        // PostgREST error bodies are JSON; fall back to the raw text
        let body = response.text().await.unwrap_or_default();
        let error: PostgrestError = serde_json::from_str(&body).unwrap_or_default();
        let message = error.message.unwrap_or_else(|| {
            if body.is_empty() {
                "Unknown error".into()
            } else {
                body.clone()
            }
        });

        // 409 also covers foreign key violations (23503); only uniqueness is a conflict.
        let unique_violation = match error.code.as_deref() {
            Some(code) => code == UNIQUE_VIOLATION,
            None => status == StatusCode::CONFLICT,
        };
        if unique_violation {
            debug!(%message, "Unique constraint violation");
            return SupabaseError::Conflict(message);
        }

        warn!(status = status.as_u16(), code = ?error.code, %message, "Supabase request failed");
        SupabaseError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
