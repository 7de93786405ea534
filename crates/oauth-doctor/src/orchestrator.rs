use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use oauth_doctor_cli::Cli;
use oauth_doctor_config::{
    env_example_path, load_credentials, CredentialSettings, LoadedCredentials,
};
use oauth_doctor_diagnostics::{
    credentials_check, default_probe_plan, render_report_json, render_summary_line,
    run_probe_plan, CheckResult, CheckStatus, DiagnosticReport, FixScriptStatus, OAuthProvider,
    ProbeContext, ProbeDescriptor, ProbeObserver, ProbeSettings, ReportFormat, SkippedProbe,
    AUTHORIZE_CHECK_KEY,
};
use oauth_doctor_remediation::{
    advisory_sections, generate_fix_script, provider_console, AdvisoryLine, AdvisorySection,
    AdvisorySettings, FixScriptInput, FixScriptOutcome,
};

use crate::console::{Console, ConsoleRole};

pub(crate) const TROUBLESHOOTING_GUIDE: &str = "GOOGLE-OAUTH-TROUBLESHOOTING.md";
const FIRST_PROBE_SECTION: usize = 2;
const BANNER_INNER_WIDTH: usize = 59;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Resolved inputs for one diagnostic run.
pub(crate) struct DiagnosticSettings {
    pub(crate) credentials: CredentialSettings,
    pub(crate) probe: ProbeSettings,
    pub(crate) advisory: AdvisorySettings,
    /// `None` when script generation is disabled.
    pub(crate) fix_script: Option<PathBuf>,
    pub(crate) format: ReportFormat,
}

impl DiagnosticSettings {
    pub(crate) fn from_cli(cli: &Cli) -> Self {
        let provider: OAuthProvider = cli.provider().into();
        Self {
            credentials: CredentialSettings {
                env_file: cli.env_file.clone(),
                url_var: cli.url_var.clone(),
                key_var: cli.key_var.clone(),
                min_key_length: cli.min_key_length,
            },
            probe: ProbeSettings {
                timeout_ms: cli.probe.timeout_ms,
                provider,
                table: cli.probe.table.clone(),
            },
            advisory: AdvisorySettings {
                url_var: cli.url_var.clone(),
                key_var: cli.key_var.clone(),
                site_urls: cli.site_urls.clone(),
                provider,
            },
            fix_script: (!cli.no_fix_script).then(|| cli.fix_script.clone()),
            format: cli.output_format.into(),
        }
    }
}

/// Keycap emoji for a numbered section, e.g. `3️⃣`.
fn section_marker(number: usize) -> String {
    format!("{number}\u{fe0f}\u{20e3}")
}

fn section_title(number: usize, title: &str) -> String {
    format!("{}  {title}", section_marker(number))
}

fn render_check<W: Write>(console: &mut Console<W>, result: &CheckResult) -> io::Result<()> {
    match result.status {
        CheckStatus::Pass => console.success(&result.message)?,
        CheckStatus::Fail => console.error(&result.message)?,
        CheckStatus::Indeterminate => console.warning(&result.message)?,
    }
    for detail in &result.details {
        console.line(&format!("  {detail}"))?;
    }
    if let Some(action) = result.action.as_deref() {
        console.info(action)?;
    }
    Ok(())
}

fn render_advisory<W: Write>(
    console: &mut Console<W>,
    number: usize,
    section: &AdvisorySection,
) -> io::Result<()> {
    console.header(&section_title(number, &section.title))?;
    for line in &section.lines {
        match line {
            AdvisoryLine::Info(text) => console.info(text)?,
            AdvisoryLine::Warning(text) => console.warning(text)?,
            AdvisoryLine::Error(text) => console.error(text)?,
            AdvisoryLine::Label(text) => console.painted(ConsoleRole::Emphasis, text)?,
            AdvisoryLine::Item(text) => {
                console.painted(ConsoleRole::Success, &format!("  {text}"))?
            }
            AdvisoryLine::Note(text) => console.line(&format!("  {text}"))?,
            AdvisoryLine::Blank => console.blank()?,
        }
    }
    Ok(())
}

/// Prints one numbered section per probe as the driver reports progress.
struct ConsoleProbeObserver<'a, W: Write> {
    console: &'a mut Console<W>,
    next_section: usize,
    open_section: Option<&'static str>,
    error: Option<io::Error>,
}

impl<'a, W: Write> ConsoleProbeObserver<'a, W> {
    fn new(console: &'a mut Console<W>) -> Self {
        Self {
            console,
            next_section: FIRST_PROBE_SECTION,
            open_section: None,
            error: None,
        }
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(error) = result {
            self.error.get_or_insert(error);
        }
    }

    fn open(&mut self, descriptor: &ProbeDescriptor) {
        if self.open_section == Some(descriptor.key) {
            return;
        }
        self.open_section = Some(descriptor.key);
        let title = section_title(self.next_section, descriptor.title);
        self.next_section += 1;
        let result = self.console.header(&title);
        self.record(result);
    }

    fn finish(self) -> io::Result<usize> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.next_section),
        }
    }
}

impl<W: Write> ProbeObserver for ConsoleProbeObserver<'_, W> {
    fn probe_started(&mut self, descriptor: &ProbeDescriptor, context: &ProbeContext) {
        self.open(descriptor);
        if descriptor.key == AUTHORIZE_CHECK_KEY {
            let result = announce_endpoint(self.console, &context.authorize_url());
            self.record(result);
        }
    }

    fn probe_finished(&mut self, descriptor: &ProbeDescriptor, result: &CheckResult) {
        self.open(descriptor);
        let rendered = render_check(self.console, result);
        self.record(rendered);
    }

    fn probe_skipped(&mut self, descriptor: &ProbeDescriptor, _skipped: &SkippedProbe) {
        self.open(descriptor);
        let result = self
            .console
            .warning("Skipped: the env file does not hold a usable URL and key");
        self.record(result);
    }
}

fn announce_endpoint<W: Write>(console: &mut Console<W>, url: &str) -> io::Result<()> {
    console.info("Checking the OAuth endpoint:")?;
    let painted = console.paint(ConsoleRole::Item, url);
    console.line(&format!("  {painted}"))?;
    console.blank()
}

fn fix_script_input(
    settings: &DiagnosticSettings,
    loaded: &LoadedCredentials,
) -> Option<FixScriptInput> {
    let credentials = loaded.service_credentials()?;
    Some(FixScriptInput {
        url: credentials.base_url().to_string(),
        env_file: settings.credentials.env_file.clone(),
        env_example: env_example_path(&settings.credentials.env_file),
        url_var: settings.credentials.url_var.clone(),
        key_var: settings.credentials.key_var.clone(),
        site_urls: settings.advisory.site_urls.clone(),
        provider: settings.probe.provider,
    })
}

fn run_fix_script_step<W: Write>(
    settings: &DiagnosticSettings,
    loaded: &LoadedCredentials,
    console: &mut Console<W>,
) -> Result<FixScriptOutcome> {
    console.header("🔧 Fix script")?;
    let Some(path) = settings.fix_script.as_deref() else {
        console.info("Fix script generation is disabled (--no-fix-script)")?;
        return Ok(FixScriptOutcome::Disabled);
    };
    let input = fix_script_input(settings, loaded);
    let outcome = generate_fix_script(path, input.as_ref())
        .with_context(|| format!("failed to generate fix script {}", path.display()))?;
    match &outcome {
        FixScriptOutcome::Written { path, project_ref } => {
            let shown = path.display();
            console.success(&format!("Created fix script: {shown}"))?;
            console.info(&format!("Dashboard links point at project {project_ref}"))?;
            console.info(&format!("Run it with: bash {shown} (use Git Bash on Windows)"))?;
        }
        FixScriptOutcome::SkippedIncompleteCredentials => {
            console.warning("Cannot create a fix script without a valid URL and key")?;
        }
        FixScriptOutcome::Disabled => {}
    }
    Ok(outcome)
}

fn render_summary<W: Write>(
    settings: &DiagnosticSettings,
    report: &DiagnosticReport,
    console: &mut Console<W>,
) -> io::Result<()> {
    console.header("📋 Summary")?;
    let summary = report.summary();
    if !report.credentials_complete {
        console.error(&format!(
            "{} is not configured correctly - fix it first!",
            settings.credentials.env_file.display()
        ))?;
        console.info(&format!("See: {TROUBLESHOOTING_GUIDE}"))?;
    } else {
        if summary.fail == 0 {
            console.success("Basic checks passed!")?;
        } else {
            console.error(&format!(
                "{} check(s) failed - review the sections above",
                summary.fail
            ))?;
        }
        let console_name = provider_console(settings.probe.provider).name;
        console.info(&format!(
            "Make sure every manual step in Supabase, {console_name} and Netlify is done"
        ))?;
        if let Some(path) = report.fix_script.path.as_deref() {
            console.info(&format!("See the script: {path}"))?;
        }
    }
    console.info(&render_summary_line(&summary))?;
    console.blank()?;
    let guide = console.paint(ConsoleRole::Item, TROUBLESHOOTING_GUIDE);
    console.painted(ConsoleRole::Emphasis, &format!("📖 Full guide: {guide}"))?;
    console.blank()
}

fn render_banner<W: Write>(
    settings: &DiagnosticSettings,
    console: &mut Console<W>,
) -> io::Result<()> {
    let title = format!("🔍 {} OAuth Diagnostic Tool", settings.probe.provider);
    let width = BANNER_INNER_WIDTH;
    let border = "═".repeat(width);
    let lines = [
        format!("╔{border}╗"),
        format!("║{title:^width$}║"),
        format!("║{:^width$}║", "for Supabase projects"),
        format!("╚{border}╝"),
    ];
    console.blank()?;
    for line in lines {
        console.painted(ConsoleRole::Banner, &line)?;
    }
    Ok(())
}

/// Runs every section in order and prints the human-readable report.
fn run_sections<W: Write>(
    settings: &DiagnosticSettings,
    console: &mut Console<W>,
) -> Result<DiagnosticReport> {
    let started = Instant::now();
    render_banner(settings, console)?;

    let env_file = settings.credentials.env_file.display().to_string();
    console.header(&section_title(1, &format!("Checking {env_file}")))?;
    let loaded = load_credentials(&settings.credentials)
        .with_context(|| format!("failed to load credentials from {env_file}"))?;
    let env_check = credentials_check(
        &loaded,
        &settings.credentials.url_var,
        &settings.credentials.key_var,
    );
    render_check(console, &env_check)?;

    let plan = default_probe_plan();
    let mut observer = ConsoleProbeObserver::new(console);
    let probes = run_probe_plan(&plan, &loaded, &settings.probe, &mut observer);
    let mut next_section = observer.finish()?;

    for section in advisory_sections(&settings.advisory, loaded.url.as_deref()) {
        render_advisory(console, next_section, &section)?;
        next_section += 1;
    }

    let outcome = run_fix_script_step(settings, &loaded, console)?;

    let mut checks = Vec::with_capacity(probes.checks.len() + 1);
    checks.push(env_check);
    checks.extend(probes.checks);
    let report = DiagnosticReport {
        credentials_complete: loaded.is_complete(),
        checks,
        skipped: probes.skipped,
        fix_script: FixScriptStatus {
            code: outcome.code().to_string(),
            path: outcome.path().map(|path| path.display().to_string()),
        },
    };
    render_summary(settings, &report, console)?;
    console.flush()?;
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "diagnostic run complete"
    );
    Ok(report)
}

/// Runs the diagnostics and writes the report in the configured format.
pub(crate) fn run_diagnostics<W: Write>(
    settings: &DiagnosticSettings,
    console: &mut Console<W>,
) -> Result<DiagnosticReport> {
    match settings.format {
        ReportFormat::Text => run_sections(settings, console),
        ReportFormat::Json => {
            let report = run_sections(settings, &mut Console::new(io::sink(), false))?;
            console.line(&render_report_json(&report))?;
            console.flush()?;
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use httpmock::Method::GET;
    use httpmock::MockServer;
    use oauth_doctor_config::CredentialSettings;
    use oauth_doctor_diagnostics::{OAuthProvider, ProbeSettings, ReportFormat};
    use oauth_doctor_remediation::AdvisorySettings;
    use serde_json::{json, Value};

    use super::{run_diagnostics, section_marker, DiagnosticSettings};
    use crate::console::Console;

    fn settings(root: &Path, format: ReportFormat) -> DiagnosticSettings {
        DiagnosticSettings {
            credentials: CredentialSettings {
                env_file: root.join(".env.local"),
                ..CredentialSettings::default()
            },
            probe: ProbeSettings {
                timeout_ms: 2_000,
                ..ProbeSettings::default()
            },
            advisory: AdvisorySettings {
                url_var: "VITE_SUPABASE_URL".to_string(),
                key_var: "VITE_SUPABASE_ANON_KEY".to_string(),
                site_urls: vec!["https://crm.example.com".to_string()],
                provider: OAuthProvider::Google,
            },
            fix_script: Some(root.join("fix_oauth.sh")),
            format,
        }
    }

    fn write_env(root: &Path, url: &str, key: &str) {
        std::fs::write(
            root.join(".env.local"),
            format!("VITE_SUPABASE_URL={url}\nVITE_SUPABASE_ANON_KEY={key}\n"),
        )
        .expect("write env file");
    }

    fn run(settings: &DiagnosticSettings) -> (super::DiagnosticReport, String) {
        let mut console = Console::new(Vec::new(), false);
        let report = run_diagnostics(settings, &mut console).expect("run diagnostics");
        let output = String::from_utf8(console.into_inner()).expect("utf8");
        (report, output)
    }

    fn mock_healthy_project(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/");
            then.status(200).json_body(json!({"swagger": "2.0"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/auth/v1/settings");
            then.status(200).json_body(json!({"external": {"google": true}}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/user_profiles");
            then.status(200).json_body(json!([]));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/auth/v1/authorize")
                .query_param("provider", "google");
            then.status(302)
                .header("Location", "https://accounts.google.com/o/oauth2/v2/auth");
        });
    }

    #[test]
    fn unit_section_marker_builds_keycap_emoji() {
        assert_eq!(section_marker(3), "3\u{fe0f}\u{20e3}");
    }

    #[test]
    fn functional_missing_env_file_still_prints_advisories_and_summary() {
        let temp = tempfile::tempdir().expect("tempdir");
        let settings = settings(temp.path(), ReportFormat::Text);
        let (report, output) = run(&settings);

        assert!(!report.credentials_complete);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].code, "env_file_missing");
        assert_eq!(report.skipped.len(), 4);
        assert_eq!(report.fix_script.code, "skipped_incomplete_credentials");
        assert!(!temp.path().join("fix_oauth.sh").exists());

        assert!(output.contains("cp "));
        assert!(output.contains("Redirect URLs"));
        assert!(output.contains("Netlify environment variables"));
        assert!(output.contains("Google Cloud Console"));
        assert!(output.contains("https://<project-ref>.supabase.co/auth/v1/callback"));
        assert!(output.contains("is not configured correctly"));
        assert!(output.contains("checks=1 pass=0 warn=0 fail=1 skipped=4"));
        assert!(output.contains("GOOGLE-OAUTH-TROUBLESHOOTING.md"));
    }

    #[test]
    fn functional_sections_are_numbered_in_fixed_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_env(temp.path(), "https://your-project.supabase.co", "short");
        let (_, output) = run(&settings(temp.path(), ReportFormat::Text));

        let positions = (1..=8)
            .map(|number| {
                output
                    .find(&format!("{}  ", section_marker(number)))
                    .unwrap_or_else(|| panic!("section {number} missing"))
            })
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        let summary = output.find("📋 Summary").expect("summary");
        assert!(positions[7] < summary);
    }

    #[test]
    fn integration_healthy_project_passes_every_check_and_writes_script() {
        let server = MockServer::start();
        mock_healthy_project(&server);
        let temp = tempfile::tempdir().expect("tempdir");
        write_env(temp.path(), &server.base_url(), &"k".repeat(150));
        let (report, output) = run(&settings(temp.path(), ReportFormat::Text));

        assert!(report.credentials_complete);
        assert!(report.skipped.is_empty());
        let summary = report.summary();
        assert_eq!((summary.checks, summary.pass, summary.fail), (5, 5, 0));
        assert_eq!(report.fix_script.code, "written");
        assert!(temp.path().join("fix_oauth.sh").exists());

        assert!(output.contains(&format!(
            "{}/auth/v1/authorize?provider=google",
            server.base_url()
        )));
        assert!(output.contains("Dashboard links point at project 127"));
        assert!(output.contains("Basic checks passed!"));
        assert!(output.contains("See the script:"));
        assert!(!output.contains(&"k".repeat(150)));
    }

    #[test]
    fn integration_json_format_prints_only_the_report() {
        let server = MockServer::start();
        mock_healthy_project(&server);
        let temp = tempfile::tempdir().expect("tempdir");
        write_env(temp.path(), &server.base_url(), &"k".repeat(150));
        let mut settings = settings(temp.path(), ReportFormat::Json);
        settings.fix_script = None;
        let (report, output) = run(&settings);

        let payload: Value = serde_json::from_str(output.trim()).expect("json output");
        assert_eq!(payload["summary"]["pass"], 5);
        assert_eq!(payload["fix_script"]["code"], "disabled");
        assert_eq!(payload["checks"][4]["key"], "authorize_flow");
        assert_eq!(report.fix_script.code, "disabled");
        assert!(!temp.path().join("fix_oauth.sh").exists());
    }

    #[test]
    fn regression_unreadable_env_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(temp.path().join(".env.local")).expect("env dir");
        let mut console = Console::new(Vec::new(), false);
        let error = run_diagnostics(&settings(temp.path(), ReportFormat::Text), &mut console)
            .expect_err("directory env file must fail");
        assert!(format!("{error:#}").contains("failed to load credentials"));
    }
}
