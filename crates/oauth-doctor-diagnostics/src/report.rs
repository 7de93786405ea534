use crate::check::{CheckResult, CheckStatus};
use crate::driver::SkippedProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of the fix-script step as recorded in the report.
pub struct FixScriptStatus {
    pub code: String,
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything a run produced, in execution order.
pub struct DiagnosticReport {
    pub credentials_complete: bool,
    pub checks: Vec<CheckResult>,
    pub skipped: Vec<SkippedProbe>,
    pub fix_script: FixScriptStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagnosticSummary {
    pub checks: usize,
    pub pass: usize,
    pub indeterminate: usize,
    pub fail: usize,
    pub skipped: usize,
}

impl DiagnosticReport {
    pub fn summary(&self) -> DiagnosticSummary {
        let count = |status: CheckStatus| {
            self.checks
                .iter()
                .filter(|check| check.status == status)
                .count()
        };
        DiagnosticSummary {
            checks: self.checks.len(),
            pass: count(CheckStatus::Pass),
            indeterminate: count(CheckStatus::Indeterminate),
            fail: count(CheckStatus::Fail),
            skipped: self.skipped.len(),
        }
    }
}

pub fn render_summary_line(summary: &DiagnosticSummary) -> String {
    format!(
        "checks={} pass={} warn={} fail={} skipped={}",
        summary.checks, summary.pass, summary.indeterminate, summary.fail, summary.skipped
    )
}

pub fn render_report_json(report: &DiagnosticReport) -> String {
    let summary = report.summary();
    serde_json::json!({
        "summary": {
            "checks": summary.checks,
            "pass": summary.pass,
            "indeterminate": summary.indeterminate,
            "fail": summary.fail,
            "skipped": summary.skipped,
            "credentials_complete": report.credentials_complete,
        },
        "checks": report
            .checks
            .iter()
            .map(|check| {
                serde_json::json!({
                    "key": check.key,
                    "status": check.status.as_str(),
                    "code": check.code,
                    "message": check.message,
                    "details": check.details,
                    "action": check.action,
                })
            })
            .collect::<Vec<_>>(),
        "skipped": report
            .skipped
            .iter()
            .map(|skipped| {
                serde_json::json!({
                    "key": skipped.key,
                    "title": skipped.title,
                    "code": skipped.code,
                })
            })
            .collect::<Vec<_>>(),
        "fix_script": {
            "code": report.fix_script.code,
            "path": report.fix_script.path,
        },
    })
    .to_string()
}
