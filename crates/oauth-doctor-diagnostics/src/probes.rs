use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::de::Error as _;
use serde_json::Value;

use crate::check::{CheckResult, CheckStatus};
use crate::provider::OAuthProvider;

pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PROBE_TABLE: &str = "user_profiles";
pub const REST_ROOT_CHECK_KEY: &str = "rest_root";
pub const AUTH_SETTINGS_CHECK_KEY: &str = "auth_provider";
pub const TABLE_CHECK_KEY: &str = "table";
pub const AUTHORIZE_CHECK_KEY: &str = "authorize_flow";
const BODY_PREVIEW_CHARS: usize = 200;
const LOCATION_PREVIEW_CHARS: usize = 100;
const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Knobs shared by every probe.
pub struct ProbeSettings {
    pub timeout_ms: u64,
    pub provider: OAuthProvider,
    pub table: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            provider: OAuthProvider::Google,
            table: DEFAULT_PROBE_TABLE.to_string(),
        }
    }
}

/// Everything a probe needs: the target project, the optional anon key, and
/// two HTTP clients (one following redirects, one not).
pub struct ProbeContext {
    base_url: String,
    api_key: Option<String>,
    settings: ProbeSettings,
    client: Client,
    no_redirect_client: Client,
}

impl ProbeContext {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        settings: ProbeSettings,
    ) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_millis(settings.timeout_ms);
        let client = Client::builder().timeout(timeout).build()?;
        let no_redirect_client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            settings,
            client,
            no_redirect_client,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET carrying the anon key as both `apikey` and bearer token.
    fn keyed_get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(self.endpoint(path));
        match self.api_key.as_deref() {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    pub fn authorize_url(&self) -> String {
        format!(
            "{}?provider={}",
            self.endpoint("/auth/v1/authorize"),
            self.settings.provider.as_str()
        )
    }
}

fn send(key: &str, request: RequestBuilder) -> Result<Response, reqwest::Error> {
    let result = request.send();
    match &result {
        Ok(response) => tracing::debug!(
            probe = key,
            url = %response.url(),
            status = response.status().as_u16(),
            "probe response"
        ),
        Err(error) => tracing::warn!(probe = key, %error, "probe request failed"),
    }
    result
}

fn transport_code(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else {
        "transport_error"
    }
}

fn body_preview(response: Response) -> String {
    let body = response.text().unwrap_or_default();
    truncate_chars(&body, BODY_PREVIEW_CHARS)
}

pub fn truncate_chars(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}

/// `GET /rest/v1/`: the project answers authenticated REST calls.
pub fn probe_rest_root(ctx: &ProbeContext) -> CheckResult {
    let response = match send(REST_ROOT_CHECK_KEY, ctx.keyed_get("/rest/v1/")) {
        Ok(response) => response,
        Err(error) => {
            return CheckResult::new(
                REST_ROOT_CHECK_KEY,
                CheckStatus::Fail,
                transport_code(&error),
                format!("Failed to reach Supabase: {error}"),
            )
            .with_action("check the project URL and your network connection");
        }
    };
    let status = response.status();
    if status == StatusCode::OK {
        return CheckResult::new(
            REST_ROOT_CHECK_KEY,
            CheckStatus::Pass,
            "reachable",
            "Connection to Supabase works",
        );
    }
    CheckResult::new(
        REST_ROOT_CHECK_KEY,
        CheckStatus::Fail,
        format!("http_status_{}", status.as_u16()),
        format!("Connection error: status {}", status.as_u16()),
    )
    .with_detail(format!("Response: {}", body_preview(response)))
}

/// Reads `external.<provider>` from a settings payload; anything but `true`
/// counts as disabled. The payload and a present `external` must be objects.
pub fn provider_enabled_in_settings(
    body: &str,
    provider: OAuthProvider,
) -> Result<bool, serde_json::Error> {
    let settings = serde_json::from_str::<Value>(body)?;
    let Some(settings) = settings.as_object() else {
        return Err(serde_json::Error::custom("settings payload is not a JSON object"));
    };
    let external = match settings.get("external") {
        None | Some(Value::Null) => return Ok(false),
        Some(Value::Object(external)) => external,
        Some(_) => {
            return Err(serde_json::Error::custom("`external` is not a JSON object"));
        }
    };
    Ok(external
        .get(provider.as_str())
        .and_then(Value::as_bool)
        .unwrap_or(false))
}

/// `GET /auth/v1/settings`: the provider is enabled on the project.
///
/// The endpoint may be restricted, so only a readable payload can fail the
/// check; every other outcome is indeterminate.
pub fn probe_auth_settings(ctx: &ProbeContext) -> CheckResult {
    let provider = ctx.settings.provider;
    let unavailable_hint = "this is normal: the settings endpoint is not always available";
    let response = match send(AUTH_SETTINGS_CHECK_KEY, ctx.keyed_get("/auth/v1/settings")) {
        Ok(response) => response,
        Err(error) => {
            return CheckResult::new(
                AUTH_SETTINGS_CHECK_KEY,
                CheckStatus::Indeterminate,
                transport_code(&error),
                format!("Could not read {provider} OAuth settings: {error}"),
            )
            .with_detail(unavailable_hint);
        }
    };
    let status = response.status();
    if status != StatusCode::OK {
        return CheckResult::new(
            AUTH_SETTINGS_CHECK_KEY,
            CheckStatus::Indeterminate,
            format!("settings_unavailable_{}", status.as_u16()),
            format!(
                "Could not read {provider} OAuth settings (status: {})",
                status.as_u16()
            ),
        )
        .with_detail(unavailable_hint);
    }
    let body = response.text().unwrap_or_default();
    match provider_enabled_in_settings(&body, provider) {
        Ok(true) => CheckResult::new(
            AUTH_SETTINGS_CHECK_KEY,
            CheckStatus::Pass,
            "provider_enabled",
            format!("{provider} OAuth is enabled in Supabase"),
        ),
        Ok(false) => CheckResult::new(
            AUTH_SETTINGS_CHECK_KEY,
            CheckStatus::Fail,
            "provider_disabled",
            format!("{provider} OAuth is not enabled or not configured"),
        )
        .with_action(format!(
            "Supabase Dashboard → Authentication → Providers → {provider}"
        )),
        Err(error) => CheckResult::new(
            AUTH_SETTINGS_CHECK_KEY,
            CheckStatus::Indeterminate,
            "settings_unparsable",
            format!("Could not parse {provider} OAuth settings: {error}"),
        )
        .with_detail(unavailable_hint),
    }
}

/// Maps the table probe status: 200 and 401 both prove the table exists.
pub fn classify_table_status(status: StatusCode) -> (CheckStatus, &'static str) {
    match status {
        StatusCode::OK => (CheckStatus::Pass, "exists_readable"),
        StatusCode::UNAUTHORIZED => (CheckStatus::Pass, "exists_auth_required"),
        StatusCode::NOT_FOUND => (CheckStatus::Fail, "missing"),
        _ => (CheckStatus::Indeterminate, "unexpected_status"),
    }
}

/// `GET /rest/v1/<table>?limit=1`: the table exists and row-level security
/// behaves for an anonymous caller.
pub fn probe_table(ctx: &ProbeContext) -> CheckResult {
    let table = ctx.settings.table.as_str();
    let request = ctx
        .keyed_get(&format!("/rest/v1/{table}"))
        .header("Content-Type", "application/json")
        .query(&[("limit", "1")]);
    let response = match send(TABLE_CHECK_KEY, request) {
        Ok(response) => response,
        Err(error) => {
            return CheckResult::new(
                TABLE_CHECK_KEY,
                CheckStatus::Indeterminate,
                transport_code(&error),
                format!("Failed to check table {table}: {error}"),
            );
        }
    };
    let status = response.status();
    match classify_table_status(status) {
        (CheckStatus::Pass, code @ "exists_readable") => CheckResult::new(
            TABLE_CHECK_KEY,
            CheckStatus::Pass,
            code,
            format!("Table {table} exists"),
        )
        .with_detail("RLS looks correct (anonymous request, no rows exposed)"),
        (CheckStatus::Pass, code) => CheckResult::new(
            TABLE_CHECK_KEY,
            CheckStatus::Pass,
            code,
            format!("Table {table} exists"),
        )
        .with_detail("RLS looks correct (authentication required)"),
        (CheckStatus::Fail, code) => CheckResult::new(
            TABLE_CHECK_KEY,
            CheckStatus::Fail,
            code,
            format!("Table {table} does not exist"),
        )
        .with_action("run supabase-schema.sql in the Supabase SQL Editor"),
        (CheckStatus::Indeterminate, _) => CheckResult::new(
            TABLE_CHECK_KEY,
            CheckStatus::Indeterminate,
            format!("unexpected_status_{}", status.as_u16()),
            format!("Unexpected status: {}", status.as_u16()),
        )
        .with_detail(format!("Response: {}", body_preview(response))),
    }
}

/// Classifies an authorize response: a redirect into the provider's identity
/// domain passes, a redirect elsewhere is a warning, anything else fails.
pub fn classify_authorize_response(
    status: StatusCode,
    location: Option<&str>,
    provider: OAuthProvider,
) -> (CheckStatus, &'static str) {
    if !REDIRECT_STATUSES.contains(&status.as_u16()) {
        return (CheckStatus::Fail, "unexpected_status");
    }
    match location {
        Some(location) if location.contains(provider.identity_domain()) => {
            (CheckStatus::Pass, "redirects_to_provider")
        }
        _ => (CheckStatus::Indeterminate, "redirect_elsewhere"),
    }
}

/// `GET /auth/v1/authorize?provider=<id>` without following redirects.
pub fn probe_authorize(ctx: &ProbeContext) -> CheckResult {
    let provider = ctx.settings.provider;
    let request = ctx
        .no_redirect_client
        .get(ctx.endpoint("/auth/v1/authorize"))
        .query(&[("provider", provider.as_str())]);
    let response = match send(AUTHORIZE_CHECK_KEY, request) {
        Ok(response) => response,
        Err(error) => {
            return CheckResult::new(
                AUTHORIZE_CHECK_KEY,
                CheckStatus::Fail,
                transport_code(&error),
                format!("Failed to check the OAuth endpoint: {error}"),
            );
        }
    };
    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    match classify_authorize_response(status, location.as_deref(), provider) {
        (CheckStatus::Pass, code) => CheckResult::new(
            AUTHORIZE_CHECK_KEY,
            CheckStatus::Pass,
            code,
            format!("OAuth endpoint responds and redirects to {provider}"),
        ),
        (CheckStatus::Indeterminate, code) => CheckResult::new(
            AUTHORIZE_CHECK_KEY,
            CheckStatus::Indeterminate,
            code,
            format!(
                "OAuth endpoint responds but does not redirect to {provider}: {}",
                truncate_chars(location.as_deref().unwrap_or(""), LOCATION_PREVIEW_CHARS)
            ),
        )
        .with_action(format!(
            "check the {provider} client ID and secret in Supabase → Authentication → Providers"
        )),
        (CheckStatus::Fail, _) => CheckResult::new(
            AUTHORIZE_CHECK_KEY,
            CheckStatus::Fail,
            format!("unexpected_status_{}", status.as_u16()),
            format!(
                "OAuth endpoint did not respond as expected (status: {})",
                status.as_u16()
            ),
        ),
    }
}
