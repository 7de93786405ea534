use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_ENV_FILE: &str = ".env.local";
pub const DEFAULT_URL_VAR: &str = "VITE_SUPABASE_URL";
pub const DEFAULT_KEY_VAR: &str = "VITE_SUPABASE_ANON_KEY";

#[derive(Debug, Error)]
/// Failure reading an env file that exists on disk.
pub enum EnvFileError {
    #[error("failed to read env file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Raw values extracted from an env file before validation.
pub struct EnvFileValues {
    pub url: Option<String>,
    pub key: Option<String>,
}

/// Extracts the two configured variables from env-file text.
///
/// Lines are trimmed and matched on the exact `NAME=` prefix; the value is
/// everything after the first `=`, trimmed. A later line overrides an earlier
/// one.
pub fn parse_env_file_text(raw: &str, url_var: &str, key_var: &str) -> EnvFileValues {
    let url_prefix = format!("{url_var}=");
    let key_prefix = format!("{key_var}=");
    let mut values = EnvFileValues::default();
    for line in raw.lines() {
        let line = line.trim();
        if line.starts_with(&url_prefix) {
            values.url = value_after_first_equals(line);
        } else if line.starts_with(&key_prefix) {
            values.key = value_after_first_equals(line);
        }
    }
    values
}

fn value_after_first_equals(line: &str) -> Option<String> {
    line.split_once('=')
        .map(|(_, value)| value.trim().to_string())
}

/// Reads and parses the env file. `Ok(None)` means the file does not exist.
pub fn read_env_file(
    path: &Path,
    url_var: &str,
    key_var: &str,
) -> Result<Option<EnvFileValues>, EnvFileError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "env file not found");
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path).map_err(|source| EnvFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(parse_env_file_text(&raw, url_var, key_var)))
}

/// Sibling template users copy from, e.g. `.env.local.example`.
pub fn env_example_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| DEFAULT_ENV_FILE.into());
    name.push(".example");
    path.with_file_name(name)
}
