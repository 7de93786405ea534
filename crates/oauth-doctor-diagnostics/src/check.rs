use oauth_doctor_config::{mask_key, CredentialsStatus, KeyIssue, LoadedCredentials, UrlIssue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Tri-state outcome of one check.
pub enum CheckStatus {
    Pass,
    Fail,
    /// Could not be verified automatically; rendered as a warning.
    Indeterminate,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
            CheckStatus::Indeterminate => "indeterminate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One classified check outcome.
pub struct CheckResult {
    pub key: String,
    pub status: CheckStatus,
    /// Stable machine-readable reason, e.g. `exists_auth_required`.
    pub code: String,
    pub message: String,
    pub details: Vec<String>,
    pub action: Option<String>,
}

impl CheckResult {
    pub fn new(key: &str, status: CheckStatus, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            status,
            code: code.into(),
            message: message.into(),
            details: Vec::new(),
            action: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

pub const ENV_FILE_CHECK_KEY: &str = "env_file";

/// Turns the credential load into the first check of the report.
pub fn credentials_check(loaded: &LoadedCredentials, url_var: &str, key_var: &str) -> CheckResult {
    let env_file = loaded.env_file.display().to_string();
    let code = loaded.status.as_str();
    match loaded.status {
        CredentialsStatus::EnvFileMissing => CheckResult::new(
            ENV_FILE_CHECK_KEY,
            CheckStatus::Fail,
            code,
            format!("{env_file} does not exist"),
        )
        .with_action(format!(
            "create it from the example: cp {} {env_file}",
            oauth_doctor_config::env_example_path(&loaded.env_file).display()
        )),
        CredentialsStatus::UrlInvalid(issue) => {
            let reason = match issue {
                UrlIssue::Missing => "is not set",
                UrlIssue::Placeholder => "still holds the example placeholder",
            };
            CheckResult::new(
                ENV_FILE_CHECK_KEY,
                CheckStatus::Fail,
                code,
                format!("{url_var} {reason}"),
            )
            .with_action(format!(
                "set {url_var} in {env_file} to the project URL from the Supabase Dashboard"
            ))
        }
        CredentialsStatus::KeyInvalid(issue) => {
            let reason = match issue {
                KeyIssue::Missing => "is not set".to_string(),
                KeyIssue::Placeholder => "still holds the example placeholder".to_string(),
                KeyIssue::TooShort { length, minimum } => {
                    format!("is too short ({length} chars, expected at least {minimum})")
                }
            };
            let mut result = CheckResult::new(
                ENV_FILE_CHECK_KEY,
                CheckStatus::Fail,
                code,
                format!("{key_var} {reason}"),
            )
            .with_action(format!(
                "set {key_var} in {env_file} to the anon key from the Supabase Dashboard"
            ));
            if let Some(url) = loaded.url.as_deref() {
                result = result.with_detail(format!("Supabase URL: {url}"));
            }
            result
        }
        CredentialsStatus::Complete => {
            let mut result = CheckResult::new(
                ENV_FILE_CHECK_KEY,
                CheckStatus::Pass,
                code,
                format!("{env_file} holds a Supabase URL and anon key"),
            );
            if let Some(url) = loaded.url.as_deref() {
                result = result.with_detail(format!("Supabase URL: {url}"));
            }
            if let Some(key) = loaded.key.as_deref() {
                result = result.with_detail(format!("Supabase Key: {}", mask_key(key)));
            }
            result
        }
    }
}
