//! AWS Secrets Manager backend
//!
//! The key `vendor1/keyA` is stored as the secret `mftf/vendor1/keyA`,
//! whose secret string is a JSON object with an entry named after the
//! subkey: `{"keyA": "..."}`.
//!
//! The remote call goes through the `SecretManagerClient` trait so tests
//! and hosts can substitute their own client; `HttpSecretManagerClient` is
//! the default, speaking the service's JSON protocol with SigV4 signing.

mod backend;
mod client;
mod credentials;
mod http_client;
mod sigv4;

pub use backend::{client_factory, AwsBackendSettings, AwsSecretsManagerBackend, ClientFactory};
pub use client::{ClientError, GetSecretValueOutput, SecretManagerClient};
pub use credentials::{load_credentials, AwsCredentials};
pub use http_client::HttpSecretManagerClient;
