//! Remote secret manager client contract

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response of the `GetSecretValue` operation
///
/// Only `secret_string` matters to the backend; the other fields are kept
/// for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSecretValueOutput {
    #[serde(rename = "ARN", default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub secret_string: Option<String>,
}

impl GetSecretValueOutput {
    /// Output carrying only a secret string
    pub fn with_secret_string(secret_string: impl Into<String>) -> Self {
        Self {
            secret_string: Some(secret_string.into()),
            ..Default::default()
        }
    }
}

/// Errors returned by a `SecretManagerClient`
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service answered with an error code
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The service is failing or throttling; the request may succeed later
    #[error("{code} (retryable): {message}")]
    Unavailable { code: String, message: String },

    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be signed
    #[error("Signing error: {0}")]
    Signing(String),
}

impl ClientError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The one remote operation the backend needs
pub trait SecretManagerClient: Send + Sync {
    /// Fetch the current value of the secret named `secret_id`
    fn get_secret_value(&self, secret_id: &str) -> Result<GetSecretValueOutput, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_output() {
        let json = r#"{
            "ARN": "arn:aws:secretsmanager:us-east-1:123456789012:secret:mftf/vendor1/keyA-AbCdEf",
            "Name": "mftf/vendor1/keyA",
            "VersionId": "v1",
            "SecretString": "{\"keyA\":\"s3cret\"}",
            "VersionStages": ["AWSCURRENT"],
            "CreatedDate": 1.523477145713E9
        }"#;

        let output: GetSecretValueOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.name.as_deref(), Some("mftf/vendor1/keyA"));
        assert_eq!(output.secret_string.as_deref(), Some(r#"{"keyA":"s3cret"}"#));
        assert!(output.arn.unwrap().starts_with("arn:aws:secretsmanager"));
    }

    #[test]
    fn test_deserialize_binary_only() {
        let output: GetSecretValueOutput =
            serde_json::from_str(r#"{"Name": "x", "SecretBinary": "AAEC"}"#).unwrap();
        assert!(output.secret_string.is_none());
    }

    #[test]
    fn test_service_error_display() {
        let err = ClientError::service("ResourceNotFoundException", "Secrets Manager can't find the specified secret.");
        assert_eq!(
            err.to_string(),
            "ResourceNotFoundException: Secrets Manager can't find the specified secret."
        );
    }
}
