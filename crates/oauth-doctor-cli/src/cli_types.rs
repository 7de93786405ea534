use clap::ValueEnum;

use oauth_doctor_diagnostics::{OAuthProvider, ReportFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliProvider {
    Google,
    Github,
    Azure,
}

impl From<CliProvider> for OAuthProvider {
    fn from(value: CliProvider) -> Self {
        match value {
            CliProvider::Google => OAuthProvider::Google,
            CliProvider::Github => OAuthProvider::Github,
            CliProvider::Azure => OAuthProvider::Azure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for ReportFormat {
    fn from(value: CliOutputFormat) -> Self {
        match value {
            CliOutputFormat::Text => ReportFormat::Text,
            CliOutputFormat::Json => ReportFormat::Json,
        }
    }
}
