use oauth_doctor_diagnostics::OAuthProvider;

use crate::provider_console::{provider_console, supabase_callback_url};

pub const HOSTING_ENV_SETTINGS_PATH: &str =
    "https://app.netlify.com → Site settings → Environment variables";
pub const HOSTING_REDEPLOY_PATH: &str = "Deploys → Trigger deploy → Clear cache and deploy site";
pub const SUPABASE_REDIRECT_SETTINGS_PATH: &str =
    "Authentication → URL Configuration → Redirect URLs";
const PROJECT_URL_PLACEHOLDER: &str = "https://<project-ref>.supabase.co";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered line of an advisory section; the variant picks the styling.
pub enum AdvisoryLine {
    Info(String),
    Warning(String),
    Error(String),
    Label(String),
    Item(String),
    Note(String),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorySection {
    pub key: &'static str,
    pub title: String,
    pub lines: Vec<AdvisoryLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inputs for the checklists that cannot be verified automatically.
pub struct AdvisorySettings {
    pub url_var: String,
    pub key_var: String,
    pub site_urls: Vec<String>,
    pub provider: OAuthProvider,
}

/// Each site URL with and without a trailing slash, de-duplicated in order.
pub fn expected_redirect_urls(site_urls: &[String]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for site_url in site_urls {
        let base = site_url.trim().trim_end_matches('/');
        if base.is_empty() {
            continue;
        }
        for candidate in [base.to_string(), format!("{base}/")] {
            if !urls.contains(&candidate) {
                urls.push(candidate);
            }
        }
    }
    urls
}

pub fn redirect_urls_section(settings: &AdvisorySettings, url: Option<&str>) -> AdvisorySection {
    let mut lines = Vec::new();
    if url.is_none() {
        lines.push(AdvisoryLine::Error(
            "Supabase URL is missing; the list below cannot be matched to a project".to_string(),
        ));
    }
    lines.push(AdvisoryLine::Info(
        "Make sure these URLs are allowed in Supabase:".to_string(),
    ));
    lines.push(AdvisoryLine::Info(SUPABASE_REDIRECT_SETTINGS_PATH.to_string()));
    lines.push(AdvisoryLine::Blank);
    lines.extend(
        expected_redirect_urls(&settings.site_urls)
            .into_iter()
            .map(|redirect_url| AdvisoryLine::Item(format!("✓ {redirect_url}"))),
    );
    lines.push(AdvisoryLine::Blank);
    lines.push(AdvisoryLine::Warning(
        "Cannot be checked automatically - verify manually in the Supabase Dashboard".to_string(),
    ));
    AdvisorySection {
        key: "redirect_urls",
        title: "Redirect URLs".to_string(),
        lines,
    }
}

pub fn hosting_env_section(settings: &AdvisorySettings) -> AdvisorySection {
    let mut lines = vec![
        AdvisoryLine::Info("Make sure these variables are set on Netlify:".to_string()),
        AdvisoryLine::Info(HOSTING_ENV_SETTINGS_PATH.to_string()),
        AdvisoryLine::Blank,
    ];
    for (name, description) in [
        (settings.url_var.as_str(), "Supabase project URL"),
        (settings.key_var.as_str(), "Supabase anon/public key"),
    ] {
        lines.push(AdvisoryLine::Item(format!("✓ {name}")));
        lines.push(AdvisoryLine::Note(format!("  {description}")));
    }
    lines.push(AdvisoryLine::Blank);
    lines.push(AdvisoryLine::Warning(
        "Cannot be checked automatically - verify manually in the Netlify Dashboard".to_string(),
    ));
    lines.push(AdvisoryLine::Info(format!(
        "After adding variables: {HOSTING_REDEPLOY_PATH}"
    )));
    AdvisorySection {
        key: "hosting_env",
        title: "Netlify environment variables".to_string(),
        lines,
    }
}

/// Provider-side OAuth client settings. A known `url` is filled in; otherwise
/// a placeholder is shown with a replacement warning.
pub fn provider_console_section(provider: OAuthProvider, url: Option<&str>) -> AdvisorySection {
    let console = provider_console(provider);
    let project_url = url
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| PROJECT_URL_PLACEHOLDER.to_string());
    let mut lines = vec![
        AdvisoryLine::Info(format!("Make sure the {provider} OAuth client is set up correctly:")),
        AdvisoryLine::Info(console.credentials_url.to_string()),
        AdvisoryLine::Blank,
    ];
    if console.requires_origin {
        lines.push(AdvisoryLine::Label("Authorized JavaScript origins:".to_string()));
        lines.push(AdvisoryLine::Item(format!("  ✓ {project_url}")));
        lines.push(AdvisoryLine::Blank);
    }
    lines.push(AdvisoryLine::Label(format!("{}:", console.redirect_label)));
    lines.push(AdvisoryLine::Item(format!(
        "  ✓ {}",
        supabase_callback_url(&project_url)
    )));
    if url.is_none() {
        lines.push(AdvisoryLine::Blank);
        lines.push(AdvisoryLine::Warning(
            "Replace <project-ref> with the project ID from your Supabase URL".to_string(),
        ));
    }
    AdvisorySection {
        key: "provider_console",
        title: console.name.to_string(),
        lines,
    }
}

/// The three advisory sections in display order.
pub fn advisory_sections(settings: &AdvisorySettings, url: Option<&str>) -> Vec<AdvisorySection> {
    vec![
        redirect_urls_section(settings, url),
        hosting_env_section(settings),
        provider_console_section(settings.provider, url),
    ]
}
