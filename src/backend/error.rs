//! Backend-specific error types.

/// Errors that can occur while talking to the login or GraphQL endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// GraphQL response carried a non-empty `errors` array
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// GraphQL response had neither errors nor data
    #[error("GraphQL response missing 'data' field")]
    MissingData,

    /// Failed to deserialize a response body
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let error = ApiError::Status {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("401"));
        assert!(error_str.contains("Invalid credentials"));
    }

    #[test]
    fn test_api_error_graphql_joins_messages() {
        let error = ApiError::GraphQl(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(error.to_string(), "GraphQL errors: first; second");
    }

    #[test]
    fn test_api_error_missing_data() {
        assert!(ApiError::MissingData.to_string().contains("'data'"));
    }
}
