use std::borrow::Cow;
use std::path::{Path, PathBuf};

use minijinja::{context, Environment};
use oauth_doctor_core::{mark_executable, write_text_atomic};
use oauth_doctor_diagnostics::OAuthProvider;
use thiserror::Error;

use crate::advisory::expected_redirect_urls;
use crate::provider_console::{provider_console, supabase_callback_url};

pub const DEFAULT_FIX_SCRIPT_PATH: &str = "fix_oauth.sh";
pub const FALLBACK_PROJECT_REF: &str = "your-project";
const FIX_SCRIPT_TEMPLATE_NAME: &str = "fix_oauth.sh";
const FIX_SCRIPT_TEMPLATE: &str = include_str!("../templates/fix_oauth.sh.j2");

#[derive(Debug, Error)]
pub enum FixScriptError {
    #[error("failed to render fix script template: {0}")]
    Render(#[from] minijinja::Error),
    #[error("failed to write fix script {path}: {message}")]
    Write { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Values substituted into the fix script.
pub struct FixScriptInput {
    pub url: String,
    pub env_file: PathBuf,
    pub env_example: PathBuf,
    pub url_var: String,
    pub key_var: String,
    pub site_urls: Vec<String>,
    pub provider: OAuthProvider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixScriptOutcome {
    Written { path: PathBuf, project_ref: String },
    SkippedIncompleteCredentials,
    Disabled,
}

impl FixScriptOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            FixScriptOutcome::Written { .. } => "written",
            FixScriptOutcome::SkippedIncompleteCredentials => "skipped_incomplete_credentials",
            FixScriptOutcome::Disabled => "disabled",
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            FixScriptOutcome::Written { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Quotes a value for use as one bash word. Values `shell_words` leaves bare
/// are still wrapped when they contain braces, which bash would expand.
pub fn shell_quote(value: String) -> String {
    let quoted = shell_words::quote(&value);
    if matches!(quoted, Cow::Borrowed(_)) && value.contains(['{', '}']) {
        return format!("'{value}'");
    }
    quoted.into_owned()
}

/// First DNS label of the URL host: `https://abcproj.supabase.co` gives
/// `abcproj`. Falls back to `your-project` when no host can be parsed.
pub fn derive_project_ref(url: &str) -> String {
    url::Url::parse(url.trim())
        .ok()
        .and_then(|parsed| {
            parsed
                .host_str()
                .and_then(|host| host.split('.').next())
                .filter(|label| !label.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_PROJECT_REF.to_string())
}

pub fn render_fix_script(input: &FixScriptInput) -> Result<String, FixScriptError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("shell_quote", shell_quote);
    env.add_template(FIX_SCRIPT_TEMPLATE_NAME, FIX_SCRIPT_TEMPLATE)?;
    let template = env.get_template(FIX_SCRIPT_TEMPLATE_NAME)?;

    let url = input.url.trim_end_matches('/');
    let console = provider_console(input.provider);
    let rendered = template.render(context! {
        provider_name => input.provider.display_name(),
        url => url,
        project_ref => derive_project_ref(url),
        env_file => input.env_file.display().to_string(),
        env_example => input.env_example.display().to_string(),
        url_var => input.url_var,
        key_var => input.key_var,
        redirect_urls => expected_redirect_urls(&input.site_urls),
        console_name => console.name,
        console_url => console.credentials_url,
        requires_origin => console.requires_origin,
        redirect_label => console.redirect_label,
        callback_url => supabase_callback_url(url),
    })?;
    Ok(rendered)
}

/// Renders and writes the script, replacing any existing file, then tries to
/// mark it executable. Skipped when the URL or key is missing.
pub fn generate_fix_script(
    path: &Path,
    input: Option<&FixScriptInput>,
) -> Result<FixScriptOutcome, FixScriptError> {
    let Some(input) = input else {
        tracing::debug!("fix script skipped: incomplete credentials");
        return Ok(FixScriptOutcome::SkippedIncompleteCredentials);
    };
    let script = render_fix_script(input)?;
    write_text_atomic(path, &script).map_err(|error| FixScriptError::Write {
        path: path.display().to_string(),
        message: format!("{error:#}"),
    })?;
    let executable = mark_executable(path);
    tracing::debug!(path = %path.display(), executable, "fix script written");
    Ok(FixScriptOutcome::Written {
        path: path.to_path_buf(),
        project_ref: derive_project_ref(&input.url),
    })
}
