//! HTTP client for the Secrets Manager JSON protocol

use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::backend::AwsBackendSettings;
use super::client::{ClientError, GetSecretValueOutput, SecretManagerClient};
use super::credentials::AwsCredentials;
use super::sigv4::{sign, SignableRequest};
use crate::secrets::{SecretsError, SecretsResult};

const SERVICE: &str = "secretsmanager";
const TARGET: &str = "secretsmanager.GetSecretValue";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

#[derive(Serialize)]
struct GetSecretValueRequest<'a> {
    #[serde(rename = "SecretId")]
    secret_id: &'a str,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

/// Blocking Secrets Manager client
///
/// Requests are `POST /` with the operation in `X-Amz-Target`, signed with
/// SigV4 for the configured region.
pub struct HttpSecretManagerClient {
    http: Client,
    url: Url,
    host: String,
    region: String,
    credentials: AwsCredentials,
}

impl HttpSecretManagerClient {
    /// Build a client for `settings` using already-resolved credentials
    pub fn new(settings: &AwsBackendSettings, credentials: AwsCredentials) -> SecretsResult<Self> {
        let endpoint = settings
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.{}.amazonaws.com", SERVICE, settings.region));
        let url = Url::parse(&endpoint).map_err(|e| {
            SecretsError::configuration(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(SecretsError::configuration(format!(
                    "endpoint '{}' has no host",
                    endpoint
                )))
            }
        };

        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| SecretsError::configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url,
            host,
            region: settings.region.clone(),
            credentials,
        })
    }

    /// Build a client, resolving credentials for the configured profile
    pub fn from_settings(settings: &AwsBackendSettings) -> SecretsResult<Self> {
        let credentials = super::credentials::load_credentials(settings.profile.as_deref())?;
        Self::new(settings, credentials)
    }

    pub fn endpoint(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Debug for HttpSecretManagerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSecretManagerClient")
            .field("url", &self.url.as_str())
            .field("region", &self.region)
            .finish()
    }
}

impl SecretManagerClient for HttpSecretManagerClient {
    fn get_secret_value(&self, secret_id: &str) -> Result<GetSecretValueOutput, ClientError> {
        let payload = serde_json::to_vec(&GetSecretValueRequest { secret_id })
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let signable = SignableRequest {
            method: "POST",
            host: &self.host,
            path: "/",
            headers: vec![("content-type", CONTENT_TYPE), ("x-amz-target", TARGET)],
            payload: &payload,
        };
        let signed = sign(&self.credentials, &self.region, SERVICE, Utc::now(), &signable)?;

        let mut request = self
            .http
            .post(self.url.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", TARGET);
        for (name, value) in signed {
            request = request.header(name, value);
        }

        let response = request.body(payload).send()?;
        let status = response.status();
        let error_type_header = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
        } else {
            Err(error_from_response(status.as_u16(), error_type_header.as_deref(), &body))
        }
    }
}

const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "RequestLimitExceeded",
];

/// Translate an error response into a `ClientError`
///
/// The code comes from the body's `__type` (namespace stripped), then the
/// `x-amzn-ErrorType` header, then the HTTP status. Server errors, 429 and
/// throttling codes are `Unavailable`; everything else is `Service`.
fn error_from_response(status: u16, error_type_header: Option<&str>, body: &str) -> ClientError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let code = parsed
        .error_type
        .as_deref()
        .or(error_type_header)
        .map(|t| {
            let t = t.split(':').next().unwrap_or(t);
            t.rsplit('#').next().unwrap_or(t).to_string()
        })
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| format!("HTTP{}", status));

    let message = parsed
        .message
        .unwrap_or_else(|| format!("request failed with status {}", status));

    if status >= 500 || status == 429 || THROTTLING_CODES.contains(&code.as_str()) {
        ClientError::Unavailable { code, message }
    } else {
        ClientError::service(code, message)
    }
}
