use oauth_doctor_config::LoadedCredentials;

use crate::check::{CheckResult, CheckStatus};
use crate::probes::{
    probe_auth_settings, probe_authorize, probe_rest_root, probe_table, ProbeContext,
    ProbeSettings, AUTHORIZE_CHECK_KEY, AUTH_SETTINGS_CHECK_KEY, REST_ROOT_CHECK_KEY,
    TABLE_CHECK_KEY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What a probe needs before it may be attempted.
pub enum ProbeRequirement {
    /// A validated URL and anon key.
    Credentials,
}

impl ProbeRequirement {
    pub fn satisfied_by(self, loaded: &LoadedCredentials) -> bool {
        match self {
            ProbeRequirement::Credentials => loaded.is_complete(),
        }
    }

    pub fn skip_code(self) -> &'static str {
        match self {
            ProbeRequirement::Credentials => "skipped_incomplete_credentials",
        }
    }
}

#[derive(Clone, Copy)]
/// One entry of the ordered probe plan.
pub struct ProbeDescriptor {
    pub key: &'static str,
    pub title: &'static str,
    pub requirement: ProbeRequirement,
    pub run: fn(&ProbeContext) -> CheckResult,
}

impl std::fmt::Debug for ProbeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeDescriptor")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("requirement", &self.requirement)
            .finish()
    }
}

/// The fixed probe order: REST root, provider settings, table, authorize flow.
pub fn default_probe_plan() -> Vec<ProbeDescriptor> {
    vec![
        ProbeDescriptor {
            key: REST_ROOT_CHECK_KEY,
            title: "Supabase connection",
            requirement: ProbeRequirement::Credentials,
            run: probe_rest_root,
        },
        ProbeDescriptor {
            key: AUTH_SETTINGS_CHECK_KEY,
            title: "OAuth provider settings in Supabase",
            requirement: ProbeRequirement::Credentials,
            run: probe_auth_settings,
        },
        ProbeDescriptor {
            key: TABLE_CHECK_KEY,
            title: "Profiles table",
            requirement: ProbeRequirement::Credentials,
            run: probe_table,
        },
        ProbeDescriptor {
            key: AUTHORIZE_CHECK_KEY,
            title: "OAuth flow",
            requirement: ProbeRequirement::Credentials,
            run: probe_authorize,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProbe {
    pub key: String,
    pub title: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeRunReport {
    pub checks: Vec<CheckResult>,
    pub skipped: Vec<SkippedProbe>,
}

/// Receives driver progress so callers can render each probe as it runs.
pub trait ProbeObserver {
    fn probe_started(&mut self, _descriptor: &ProbeDescriptor, _context: &ProbeContext) {}
    fn probe_finished(&mut self, descriptor: &ProbeDescriptor, result: &CheckResult);
    fn probe_skipped(&mut self, descriptor: &ProbeDescriptor, skipped: &SkippedProbe);
}

/// Observer that ignores every event.
pub struct SilentProbeObserver;

impl ProbeObserver for SilentProbeObserver {
    fn probe_finished(&mut self, _descriptor: &ProbeDescriptor, _result: &CheckResult) {}
    fn probe_skipped(&mut self, _descriptor: &ProbeDescriptor, _skipped: &SkippedProbe) {}
}

/// Runs `plan` in order. Probes whose requirement is unmet are recorded as
/// skipped and never attempted; a probe failure never stops the loop.
pub fn run_probe_plan<O: ProbeObserver>(
    plan: &[ProbeDescriptor],
    loaded: &LoadedCredentials,
    settings: &ProbeSettings,
    observer: &mut O,
) -> ProbeRunReport {
    let mut report = ProbeRunReport::default();
    let context = loaded
        .url
        .as_deref()
        .map(|url| ProbeContext::new(url, loaded.key.as_deref(), settings.clone()));

    for descriptor in plan {
        let runnable_context = match &context {
            Some(Ok(context)) if descriptor.requirement.satisfied_by(loaded) => Ok(context),
            Some(Err(error)) if descriptor.requirement.satisfied_by(loaded) => Err(error),
            _ => {
                let skipped = SkippedProbe {
                    key: descriptor.key.to_string(),
                    title: descriptor.title.to_string(),
                    code: descriptor.requirement.skip_code().to_string(),
                };
                tracing::debug!(probe = descriptor.key, code = %skipped.code, "probe skipped");
                observer.probe_skipped(descriptor, &skipped);
                report.skipped.push(skipped);
                continue;
            }
        };

        let result = match runnable_context {
            Ok(context) => {
                observer.probe_started(descriptor, context);
                (descriptor.run)(context)
            }
            Err(error) => CheckResult::new(
                descriptor.key,
                CheckStatus::Fail,
                "http_client_unavailable",
                format!("Could not build an HTTP client: {error}"),
            ),
        };
        observer.probe_finished(descriptor, &result);
        report.checks.push(result);
    }

    report
}
