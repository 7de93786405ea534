use std::fs;
use std::path::Path;

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

fn binary_command(workdir: &Path) -> Command {
    let mut command = Command::new(assert_cmd::cargo::cargo_bin!("oauth-doctor"));
    command
        .current_dir(workdir)
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    command
}

fn write_env(root: &Path, url: &str, key: &str) {
    fs::write(
        root.join(".env.local"),
        format!("# local settings\nVITE_SUPABASE_URL={url}\nVITE_SUPABASE_ANON_KEY={key}\n"),
    )
    .expect("write env file");
}

fn mock_project(server: &MockServer, provider_enabled: bool) {
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/").header_exists("apikey");
        then.status(200).json_body(json!({"paths": {}}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/auth/v1/settings");
        then.status(200)
            .json_body(json!({"external": {"google": provider_enabled}}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/user_profiles")
            .query_param("limit", "1");
        then.status(401).json_body(json!({"message": "permission denied"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/auth/v1/authorize");
        then.status(302)
            .header("Location", "https://accounts.google.com/o/oauth2/v2/auth?client_id=x");
    });
}

#[test]
fn integration_placeholder_env_skips_probes_and_exits_zero() {
    let temp = tempdir().expect("tempdir");
    write_env(
        temp.path(),
        "https://your-project.supabase.co",
        "your-anon-key",
    );

    binary_command(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Google OAuth Diagnostic Tool"))
        .stdout(predicate::str::contains(
            "VITE_SUPABASE_URL still holds the example placeholder",
        ))
        .stdout(predicate::str::contains("Skipped:"))
        .stdout(predicate::str::contains("is not configured correctly"))
        .stdout(predicate::str::contains("skipped=4"));
    assert!(!temp.path().join("fix_oauth.sh").exists());
}

#[test]
fn integration_missing_env_file_prints_copy_hint() {
    let temp = tempdir().expect("tempdir");
    binary_command(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".env.local does not exist"))
        .stdout(predicate::str::contains("cp .env.local.example .env.local"))
        .stdout(predicate::str::contains("GOOGLE-OAUTH-TROUBLESHOOTING.md"));
}

#[test]
fn integration_full_run_against_mock_project_writes_fix_script() {
    let server = MockServer::start();
    mock_project(&server, true);
    let temp = tempdir().expect("tempdir");
    write_env(temp.path(), &server.base_url(), &"a".repeat(180));

    binary_command(temp.path())
        .args(["--site-url", "https://crm.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Basic checks passed!"))
        .stdout(predicate::str::contains("checks=5 pass=5 warn=0 fail=0 skipped=0"))
        .stdout(predicate::str::contains("Created fix script: fix_oauth.sh"))
        .stdout(predicate::str::contains(&"a".repeat(180)).not());

    let script = fs::read_to_string(temp.path().join("fix_oauth.sh")).expect("fix script");
    assert!(script.starts_with("#!/bin/bash"));
    assert!(script.contains("echo \"      • \"https://crm.example.com/\n"));
    assert!(script.contains("/auth/v1/callback"));
}

#[test]
fn integration_disabled_provider_is_reported_as_failure_without_failing_the_process() {
    let server = MockServer::start();
    mock_project(&server, false);
    let temp = tempdir().expect("tempdir");
    write_env(temp.path(), &server.base_url(), &"a".repeat(180));

    binary_command(temp.path())
        .arg("--no-fix-script")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 check(s) failed"))
        .stdout(predicate::str::contains(
            "Fix script generation is disabled",
        ));
    assert!(!temp.path().join("fix_oauth.sh").exists());
}

#[test]
fn integration_json_output_is_a_single_parseable_report() {
    let server = MockServer::start();
    mock_project(&server, true);
    let temp = tempdir().expect("tempdir");
    write_env(temp.path(), &server.base_url(), &"a".repeat(180));

    let output = binary_command(temp.path())
        .args(["--output-format", "json", "--fix-script", "repair.sh"])
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let payload: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(payload["summary"]["checks"], 5);
    assert_eq!(payload["checks"][3]["code"], "exists_auth_required");
    assert_eq!(payload["fix_script"]["path"], "repair.sh");
    assert!(temp.path().join("repair.sh").exists());
}

#[test]
fn regression_invalid_flag_value_exits_with_usage_error() {
    let temp = tempdir().expect("tempdir");
    binary_command(temp.path())
        .args(["--table", "profiles?select=*"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("may only contain"));
}

#[test]
fn regression_same_url_and_key_variable_is_a_usage_error() {
    let temp = tempdir().expect("tempdir");
    binary_command(temp.path())
        .args(["--url-var", "SUPABASE", "--key-var", "SUPABASE"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must name different variables"));
    assert!(!temp.path().join("fix_oauth.sh").exists());
}

#[test]
fn regression_unreadable_env_file_exits_one() {
    let temp = tempdir().expect("tempdir");
    fs::create_dir(temp.path().join(".env.local")).expect("env dir");
    binary_command(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: failed to load credentials"));
}
