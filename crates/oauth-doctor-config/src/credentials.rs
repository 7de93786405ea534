use std::path::{Path, PathBuf};

use crate::env_file::{read_env_file, EnvFileError, DEFAULT_ENV_FILE, DEFAULT_KEY_VAR, DEFAULT_URL_VAR};

pub const URL_PLACEHOLDER_MARKER: &str = "your-project";
pub const KEY_PLACEHOLDER_MARKER: &str = "your-anon";
pub const DEFAULT_MIN_KEY_LENGTH: usize = 100;
const MASK_EDGE_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where and how credentials are read.
pub struct CredentialSettings {
    pub env_file: PathBuf,
    pub url_var: String,
    pub key_var: String,
    pub min_key_length: usize,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            url_var: DEFAULT_URL_VAR.to_string(),
            key_var: DEFAULT_KEY_VAR.to_string(),
            min_key_length: DEFAULT_MIN_KEY_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlIssue {
    Missing,
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIssue {
    Missing,
    Placeholder,
    TooShort { length: usize, minimum: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of the env-file check, in the order the checks short-circuit.
pub enum CredentialsStatus {
    EnvFileMissing,
    UrlInvalid(UrlIssue),
    KeyInvalid(KeyIssue),
    Complete,
}

impl CredentialsStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnvFileMissing => "env_file_missing",
            Self::UrlInvalid(UrlIssue::Missing) => "url_missing",
            Self::UrlInvalid(UrlIssue::Placeholder) => "url_placeholder",
            Self::KeyInvalid(KeyIssue::Missing) => "key_missing",
            Self::KeyInvalid(KeyIssue::Placeholder) => "key_placeholder",
            Self::KeyInvalid(KeyIssue::TooShort { .. }) => "key_too_short",
            Self::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A validated URL and key pair; only constructed when both checks pass.
pub struct ServiceCredentials {
    pub url: String,
    pub key: String,
}

impl ServiceCredentials {
    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of loading the env file: the usable URL/key (if any) and why the
/// pair is incomplete otherwise.
pub struct LoadedCredentials {
    pub env_file: PathBuf,
    pub status: CredentialsStatus,
    pub url: Option<String>,
    pub key: Option<String>,
}

impl LoadedCredentials {
    /// The full pair, present only when `status` is `Complete`.
    pub fn service_credentials(&self) -> Option<ServiceCredentials> {
        match (&self.url, &self.key) {
            (Some(url), Some(key)) if self.status == CredentialsStatus::Complete => {
                Some(ServiceCredentials {
                    url: url.clone(),
                    key: key.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == CredentialsStatus::Complete
    }
}

/// Loads and validates credentials from `settings.env_file`.
///
/// A missing file or invalid values are reported through `status`; only a
/// file that exists but cannot be read is an error.
pub fn load_credentials(settings: &CredentialSettings) -> Result<LoadedCredentials, EnvFileError> {
    let Some(values) = read_env_file(&settings.env_file, &settings.url_var, &settings.key_var)?
    else {
        return Ok(incomplete(&settings.env_file, CredentialsStatus::EnvFileMissing, None));
    };
    Ok(validate_credentials(
        &settings.env_file,
        values.url,
        values.key,
        settings.min_key_length,
    ))
}

/// Applies the placeholder and length heuristics to raw values.
pub fn validate_credentials(
    env_file: &Path,
    url: Option<String>,
    key: Option<String>,
    min_key_length: usize,
) -> LoadedCredentials {
    let url = match classify_url(url.as_deref()) {
        Some(issue) => {
            return incomplete(env_file, CredentialsStatus::UrlInvalid(issue), None);
        }
        None => url,
    };
    if let Some(issue) = classify_key(key.as_deref(), min_key_length) {
        return incomplete(env_file, CredentialsStatus::KeyInvalid(issue), url);
    }
    LoadedCredentials {
        env_file: env_file.to_path_buf(),
        status: CredentialsStatus::Complete,
        url,
        key,
    }
}

fn incomplete(env_file: &Path, status: CredentialsStatus, url: Option<String>) -> LoadedCredentials {
    LoadedCredentials {
        env_file: env_file.to_path_buf(),
        status,
        url,
        key: None,
    }
}

pub fn classify_url(url: Option<&str>) -> Option<UrlIssue> {
    match url {
        None | Some("") => Some(UrlIssue::Missing),
        Some(value) if value.contains(URL_PLACEHOLDER_MARKER) => Some(UrlIssue::Placeholder),
        Some(_) => None,
    }
}

pub fn classify_key(key: Option<&str>, min_key_length: usize) -> Option<KeyIssue> {
    match key {
        None | Some("") => Some(KeyIssue::Missing),
        Some(value) if value.contains(KEY_PLACEHOLDER_MARKER) => Some(KeyIssue::Placeholder),
        Some(value) if value.chars().count() < min_key_length => Some(KeyIssue::TooShort {
            length: value.chars().count(),
            minimum: min_key_length,
        }),
        Some(_) => None,
    }
}

/// Shows the first and last 20 characters of a key; short keys only keep a
/// 4-character prefix.
pub fn mask_key(key: &str) -> String {
    let chars = key.chars().collect::<Vec<_>>();
    if chars.len() <= MASK_EDGE_CHARS * 2 {
        let prefix = chars.iter().take(4).collect::<String>();
        return format!("{prefix}...");
    }
    let head = chars[..MASK_EDGE_CHARS].iter().collect::<String>();
    let tail = chars[chars.len() - MASK_EDGE_CHARS..]
        .iter()
        .collect::<String>();
    format!("{head}...{tail}")
}
