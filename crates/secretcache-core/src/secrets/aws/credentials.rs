//! AWS credential lookup for a named profile

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::secrets::{SecretsError, SecretsResult};

/// Access key pair plus optional session token
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Credentials from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
    pub fn from_env() -> Option<Self> {
        let access_key_id = non_empty_var("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = non_empty_var("AWS_SECRET_ACCESS_KEY")?;
        Some(Self {
            access_key_id,
            secret_access_key,
            session_token: non_empty_var("AWS_SESSION_TOKEN"),
        })
    }

    /// Credentials for `profile` from an INI-style shared credentials file
    pub fn from_profile_file(path: &Path, profile: &str) -> SecretsResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SecretsError::configuration(format!(
                "cannot read AWS credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        parse_profile(&content, profile).ok_or_else(|| {
            SecretsError::configuration(format!(
                "profile '{}' not found or incomplete in {}",
                profile,
                path.display()
            ))
        })
    }
}

impl Drop for AwsCredentials {
    fn drop(&mut self) {
        self.secret_access_key.zeroize();
        if let Some(token) = self.session_token.as_mut() {
            token.zeroize();
        }
    }
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolve credentials for the given profile
///
/// With no profile named, environment credentials are used when present,
/// otherwise the `AWS_PROFILE` (or `default`) profile from the shared file.
/// A named profile always comes from the shared file. Failure here means the
/// client cannot be constructed.
pub fn load_credentials(profile: Option<&str>) -> SecretsResult<AwsCredentials> {
    let profile = match profile {
        Some(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => {
            if let Some(creds) = AwsCredentials::from_env() {
                return Ok(creds);
            }
            non_empty_var("AWS_PROFILE").unwrap_or_else(|| "default".to_string())
        }
    };

    let path = shared_credentials_path().ok_or_else(|| {
        SecretsError::configuration("cannot locate the AWS shared credentials file")
    })?;
    AwsCredentials::from_profile_file(&path, &profile)
}

fn shared_credentials_path() -> Option<PathBuf> {
    if let Some(path) = non_empty_var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Extract a profile section from shared credentials file content
fn parse_profile(content: &str, profile: &str) -> Option<AwsCredentials> {
    let mut in_section = false;
    let mut access_key_id = None;
    let mut secret_access_key = None;
    let mut session_token = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim();
            let name = name.strip_prefix("profile ").unwrap_or(name).trim();
            in_section = name == profile;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let value = v.trim().to_string();
            match k.trim().to_lowercase().as_str() {
                "aws_access_key_id" => access_key_id = Some(value),
                "aws_secret_access_key" => secret_access_key = Some(value),
                "aws_session_token" => session_token = Some(value),
                _ => {}
            }
        }
    }

    let mut creds = AwsCredentials::new(access_key_id?, secret_access_key?);
    creds.session_token = session_token.filter(|t| !t.is_empty());
    Some(creds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FILE: &str = "\
# shared credentials
[default]
aws_access_key_id = AKIDDEFAULT
aws_secret_access_key = default-secret

[profile ci]
aws_access_key_id=AKIDCI
aws_secret_access_key=ci-secret
aws_session_token=ci-token

[incomplete]
aws_access_key_id = AKIDINCOMPLETE
";

    #[test]
    fn test_parse_default_profile() {
        let creds = parse_profile(FILE, "default").unwrap();
        assert_eq!(creds.access_key_id, "AKIDDEFAULT");
        assert_eq!(creds.secret_access_key, "default-secret");
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn test_parse_prefixed_profile() {
        let creds = parse_profile(FILE, "ci").unwrap();
        assert_eq!(creds.access_key_id, "AKIDCI");
        assert_eq!(creds.session_token.as_deref(), Some("ci-token"));
    }

    #[test]
    fn test_parse_missing_or_incomplete() {
        assert!(parse_profile(FILE, "absent").is_none());
        assert!(parse_profile(FILE, "incomplete").is_none());
    }

    #[test]
    fn test_from_profile_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, FILE).unwrap();

        let creds = AwsCredentials::from_profile_file(&path, "ci").unwrap();
        assert_eq!(creds.access_key_id, "AKIDCI");

        let err = AwsCredentials::from_profile_file(&path, "absent").unwrap_err();
        assert!(matches!(err, SecretsError::Configuration(msg) if msg.contains("absent")));

        let missing = AwsCredentials::from_profile_file(&dir.path().join("nope"), "ci");
        assert!(matches!(missing, Err(SecretsError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts() {
        let creds = AwsCredentials::new("AKID", "very-secret").with_session_token("tok");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("AKID"));
        assert!(!printed.contains("very-secret"));
        assert!(!printed.contains("tok\""));
    }
}
