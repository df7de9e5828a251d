//! HTTP client for the marketplace backend.
//!
//! This module provides a low-level wrapper for the REST login endpoint and
//! the single GraphQL endpoint, handling bearer authentication, status checks
//! and response envelope parsing.

use super::error::ApiError;
use super::models::*;
use super::resource::LoginResponse;
use crate::identity::CookieJar;
use log::*;
use reqwest::header::SET_COOKIE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::RwLock;

const LOGIN_PATH: &str = "auth/loginVendor";

/// Makes requests to the backend and tries to conform response data to the
/// requested type.
///
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) graphql_url: String,
    access_token: RwLock<Option<String>>,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given REST base URL and GraphQL endpoint.
    ///
    pub fn new(base_url: &str, graphql_url: &str) -> Result<Self, ApiError> {
        Ok(Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            graphql_url: graphql_url.to_owned(),
            access_token: RwLock::new(None),
            http_client: reqwest::Client::builder()
                .user_agent(concat!("vendor-portal/", env!("CARGO_PKG_VERSION")))
                .build()?,
        })
    }

    /// Replace the bearer token attached to GraphQL requests.
    ///
    pub fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.write() {
            *guard = token;
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().ok().and_then(|guard| guard.clone())
    }

    /// Post credentials to the login endpoint and return the parsed body
    /// together with the cookies the response set.
    ///
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/{}", self.base_url, LOGIN_PATH);
        debug!("Posting vendor credentials to {}...", url);

        let response = self
            .http_client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = check_status(response).await?;
        let cookies = CookieJar::from_set_cookie(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        );

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            // Some deployments answer 200 with an empty body and set the cookie only
            return Ok(LoginResponseModel::default().into_response(cookies));
        }
        let model: LoginResponseModel = serde_json::from_slice(&bytes)?;
        Ok(model.into_response(cookies))
    }

    /// Run a GraphQL document and return its `data` member.
    ///
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ApiError> {
        let mut request = self
            .http_client
            .post(&self.graphql_url)
            .json(&GraphQlRequest { query, variables });
        if let Some(token) = self.access_token() {
            request = request.bearer_auth(token);
        }

        let response = check_status(request.send().await?).await?;
        let bytes = response.bytes().await?;
        let envelope: GraphQlResponse<T> = serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                "Failed to deserialize GraphQL response: {}. Response body: {}",
                e,
                String::from_utf8_lossy(&bytes)
            );
            e
        })?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            warn!("GraphQL returned errors: {:?}", messages);
            return Err(ApiError::GraphQl(messages));
        }
        envelope.data.ok_or(ApiError::MissingData)
    }
}

/// Pass 2xx responses through; turn anything else into `ApiError::Status`
/// with the best message the body offers.
///
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("Unable to read response"));
    let message = failure_message(status, &body);
    error!("API request failed with status {}: {}", status, message);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn failure_message(status: StatusCode, body: &str) -> String {
    if let Ok(MessageBody { message: Some(m) }) = serde_json::from_str::<MessageBody>(body) {
        if !m.trim().is_empty() {
            return m;
        }
    }
    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_json_message() {
        let message = failure_message(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid email or password"}"#,
        );
        assert_eq!(message, "Invalid email or password");
    }

    #[test]
    fn test_failure_message_falls_back_to_text() {
        let message = failure_message(StatusCode::BAD_GATEWAY, "  upstream down \n");
        assert_eq!(message, "upstream down");
    }

    #[test]
    fn test_failure_message_falls_back_to_reason() {
        let message = failure_message(StatusCode::NOT_FOUND, "");
        assert_eq!(message, "Not Found");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = Client::new("http://localhost:4000/", "http://localhost:4000/graphql").unwrap();
        assert_eq!(client.base_url, "http://localhost:4000");
        assert!(client.access_token().is_none());
        client.set_access_token(Some("abc".to_string()));
        assert_eq!(client.access_token().as_deref(), Some("abc"));
    }
}
