use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};

use crate::{CliOutputFormat, CliProvider};

mod probe_flags;

pub use probe_flags::CliProbeFlags;

pub(crate) fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

pub(crate) fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

pub(crate) fn parse_table_name(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("table name cannot be empty".to_string());
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err(format!(
            "table name '{trimmed}' may only contain ASCII letters, digits and '_'"
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_env_var_name(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('=') || trimmed.contains(char::is_whitespace) {
        return Err(format!(
            "'{value}' is not a valid variable name (no '=' or whitespace allowed)"
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "oauth-doctor",
    about = "Diagnose the OAuth integration between a web app and its Supabase project",
    version
)]
/// Command-line configuration for one diagnostic run.
pub struct Cli {
    #[arg(
        long = "env-file",
        env = "OAUTH_DOCTOR_ENV_FILE",
        default_value = ".env.local",
        help = "Local KEY=VALUE file holding the Supabase URL and anon key"
    )]
    pub env_file: PathBuf,

    #[arg(
        long = "url-var",
        env = "OAUTH_DOCTOR_URL_VAR",
        default_value = "VITE_SUPABASE_URL",
        value_parser = parse_env_var_name,
        help = "Variable name holding the Supabase project URL"
    )]
    pub url_var: String,

    #[arg(
        long = "key-var",
        env = "OAUTH_DOCTOR_KEY_VAR",
        default_value = "VITE_SUPABASE_ANON_KEY",
        value_parser = parse_env_var_name,
        help = "Variable name holding the Supabase anon key"
    )]
    pub key_var: String,

    #[arg(
        long = "min-key-length",
        env = "OAUTH_DOCTOR_MIN_KEY_LENGTH",
        default_value_t = 100,
        value_parser = parse_positive_usize,
        help = "Shortest anon key accepted as real; shorter values are treated as copy-paste placeholders"
    )]
    pub min_key_length: usize,

    #[command(flatten)]
    pub probe: CliProbeFlags,

    #[arg(
        long = "site-url",
        env = "OAUTH_DOCTOR_SITE_URL",
        value_delimiter = ',',
        default_value = "http://localhost:5173",
        help = "Application origin expected in the Supabase redirect allow-list (repeatable)"
    )]
    pub site_urls: Vec<String>,

    #[arg(
        long = "fix-script",
        env = "OAUTH_DOCTOR_FIX_SCRIPT",
        default_value = "fix_oauth.sh",
        help = "Path the generated remediation script is written to"
    )]
    pub fix_script: PathBuf,

    #[arg(
        long = "no-fix-script",
        env = "OAUTH_DOCTOR_NO_FIX_SCRIPT",
        default_value_t = false,
        help = "Skip writing the remediation script"
    )]
    pub no_fix_script: bool,

    #[arg(
        long = "output-format",
        env = "OAUTH_DOCTOR_OUTPUT_FORMAT",
        value_enum,
        default_value = "text",
        help = "text prints numbered sections; json prints a single machine-readable report"
    )]
    pub output_format: CliOutputFormat,

    #[arg(
        long = "no-color",
        env = "OAUTH_DOCTOR_NO_COLOR",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Disable ANSI colors in console output (a non-empty NO_COLOR does the same)"
    )]
    pub no_color: bool,
}

impl Cli {
    pub fn provider(&self) -> CliProvider {
        self.probe.provider
    }

    /// Checks rules that span several flags. The URL and key must come from
    /// different variables, otherwise the key is read as the URL.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.url_var == self.key_var {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                format!(
                    "--url-var and --key-var must name different variables (both are '{}')",
                    self.url_var
                ),
            ));
        }
        Ok(())
    }
}
