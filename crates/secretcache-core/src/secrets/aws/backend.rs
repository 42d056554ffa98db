//! Secrets Manager backend: identifier construction, result parsing and
//! error translation

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{ClientError, GetSecretValueOutput, SecretManagerClient};
use super::http_client::HttpSecretManagerClient;
use crate::log_debug;
use crate::logging::Diagnostics;
use crate::secrets::{
    LookupFailure, LookupResult, SecretBackend, SecretKey, SecretsError, SecretsResult,
};

const COMPONENT: &str = "AwsSecretsManagerBackend";

/// Settings for one Secrets Manager backend instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsBackendSettings {
    pub region: String,
    /// Credentials profile; environment credentials are used when absent
    #[serde(default)]
    pub profile: Option<String>,
    /// Endpoint override (e.g. a local emulator)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout for the remote call
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl AwsBackendSettings {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            profile: None,
            endpoint: None,
            timeout_secs: None,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Builds the remote client for a backend instance
pub type ClientFactory =
    Box<dyn Fn(&AwsBackendSettings) -> SecretsResult<Arc<dyn SecretManagerClient>> + Send + Sync>;

/// Box a closure as a [`ClientFactory`]
pub fn client_factory<F>(f: F) -> ClientFactory
where
    F: Fn(&AwsBackendSettings) -> SecretsResult<Arc<dyn SecretManagerClient>> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Reference backend backed by AWS Secrets Manager
///
/// One instance per region/profile pair. The client handle is created at
/// most once (on `initialize` or first lookup) and owned by the instance.
pub struct AwsSecretsManagerBackend {
    settings: AwsBackendSettings,
    namespace_prefix: String,
    client: OnceCell<Arc<dyn SecretManagerClient>>,
    factory: ClientFactory,
    diagnostics: Diagnostics,
}

impl AwsSecretsManagerBackend {
    /// Backend using the HTTP client and credentials for `settings.profile`
    pub fn new(
        settings: AwsBackendSettings,
        namespace_prefix: impl Into<String>,
        diagnostics: Diagnostics,
    ) -> SecretsResult<Self> {
        Self::with_client_factory(
            settings,
            namespace_prefix,
            diagnostics,
            client_factory(|settings| {
                let client = HttpSecretManagerClient::from_settings(settings)?;
                Ok(Arc::new(client))
            }),
        )
    }

    /// Backend whose client is produced by `factory`
    pub fn with_client_factory(
        settings: AwsBackendSettings,
        namespace_prefix: impl Into<String>,
        diagnostics: Diagnostics,
        factory: ClientFactory,
    ) -> SecretsResult<Self> {
        if settings.region.trim().is_empty() {
            return Err(SecretsError::configuration("AWS region must not be empty"));
        }
        Ok(Self {
            settings,
            namespace_prefix: namespace_prefix.into(),
            client: OnceCell::new(),
            factory,
            diagnostics,
        })
    }

    /// Backend using an existing client
    pub fn with_client(
        settings: AwsBackendSettings,
        namespace_prefix: impl Into<String>,
        diagnostics: Diagnostics,
        client: Arc<dyn SecretManagerClient>,
    ) -> SecretsResult<Self> {
        Self::with_client_factory(
            settings,
            namespace_prefix,
            diagnostics,
            client_factory(move |_| Ok(Arc::clone(&client))),
        )
    }

    pub fn settings(&self) -> &AwsBackendSettings {
        &self.settings
    }

    /// Whether the client handle has been created
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> SecretsResult<&Arc<dyn SecretManagerClient>> {
        self.client.get_or_try_init(|| {
            log_debug!(
                self.diagnostics,
                COMPONENT,
                "creating client for region '{}' profile '{}'",
                self.settings.region,
                self.settings.profile.as_deref().unwrap_or("<env>")
            );
            (self.factory)(&self.settings).map_err(|e| match e {
                SecretsError::Configuration(msg) => SecretsError::Configuration(msg),
                other => SecretsError::configuration(other.to_string()),
            })
        })
    }

    /// Pull the `subkey` entry out of the secret's JSON string
    fn extract(identifier: &str, subkey: &str, output: GetSecretValueOutput) -> LookupResult {
        let secret_string = output
            .secret_string
            .ok_or_else(|| LookupFailure::parse(identifier, "response has no SecretString"))?;

        let payload: Value = serde_json::from_str(&secret_string)
            .map_err(|e| LookupFailure::parse(identifier, format!("SecretString is not JSON: {}", e)))?;

        let Value::Object(entries) = payload else {
            return Err(LookupFailure::parse(identifier, "SecretString is not a JSON object"));
        };

        match entries.get(subkey) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(_) => Err(LookupFailure::parse(
                identifier,
                format!("entry '{}' is not a string", subkey),
            )),
            None => Err(LookupFailure::parse(
                identifier,
                format!("no entry named '{}'", subkey),
            )),
        }
    }
}

impl std::fmt::Debug for AwsSecretsManagerBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsManagerBackend")
            .field("settings", &self.settings)
            .field("namespace_prefix", &self.namespace_prefix)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl SecretBackend for AwsSecretsManagerBackend {
    fn name(&self) -> &str {
        "aws"
    }

    fn initialize(&self) -> SecretsResult<()> {
        self.client().map(|_| ())
    }

    fn resolve(&self, key: &SecretKey) -> LookupResult {
        let identifier = key.identifier(&self.namespace_prefix);

        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                log_debug!(self.diagnostics, COMPONENT, "no client available: {}", e);
                return Err(LookupFailure::transient(identifier, e.to_string()));
            }
        };

        log_debug!(self.diagnostics, COMPONENT, "retrieving secret {}", identifier);

        match client.get_secret_value(&identifier) {
            Ok(output) => {
                let result = Self::extract(&identifier, key.subkey(), output);
                if let Err(failure) = &result {
                    log_debug!(self.diagnostics, COMPONENT, "{}", failure);
                }
                result
            }
            Err(ClientError::Service { code, message }) => {
                log_debug!(
                    self.diagnostics,
                    COMPONENT,
                    "secret {} unavailable, error code {}: {}",
                    identifier,
                    code,
                    message
                );
                Err(LookupFailure::NotFound {
                    identifier,
                    code: Some(code),
                })
            }
            Err(e) => {
                log_debug!(self.diagnostics, COMPONENT, "retrieving {} failed: {}", identifier, e);
                Err(LookupFailure::transient(identifier, e.to_string()))
            }
        }
    }
}
