use clap::Args;

use super::{parse_positive_u64, parse_table_name};
use crate::CliProvider;

/// Flags shaping the HTTP probes sent to the Supabase project.
#[derive(Debug, Args)]
pub struct CliProbeFlags {
    #[arg(
        long = "provider",
        env = "OAUTH_DOCTOR_PROVIDER",
        value_enum,
        default_value = "google",
        help = "External identity provider expected to be enabled on the project"
    )]
    pub provider: CliProvider,

    #[arg(
        long = "table",
        env = "OAUTH_DOCTOR_TABLE",
        default_value = "user_profiles",
        value_parser = parse_table_name,
        help = "Table whose existence and row-level security is probed"
    )]
    pub table: String,

    #[arg(
        long = "timeout-ms",
        env = "OAUTH_DOCTOR_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "Per-request timeout for every probe"
    )]
    pub timeout_ms: u64,
}
