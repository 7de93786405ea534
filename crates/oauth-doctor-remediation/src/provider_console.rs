use oauth_doctor_diagnostics::OAuthProvider;

pub const SUPABASE_CALLBACK_PATH: &str = "/auth/v1/callback";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where the provider-side OAuth client is configured.
pub struct ProviderConsole {
    pub name: &'static str,
    pub credentials_url: &'static str,
    /// Google also asks for an authorized JavaScript origin.
    pub requires_origin: bool,
    pub redirect_label: &'static str,
}

pub fn provider_console(provider: OAuthProvider) -> ProviderConsole {
    match provider {
        OAuthProvider::Google => ProviderConsole {
            name: "Google Cloud Console",
            credentials_url: "https://console.cloud.google.com/apis/credentials",
            requires_origin: true,
            redirect_label: "Authorized redirect URIs",
        },
        OAuthProvider::Github => ProviderConsole {
            name: "GitHub Developer Settings",
            credentials_url: "https://github.com/settings/developers",
            requires_origin: false,
            redirect_label: "Authorization callback URL",
        },
        OAuthProvider::Azure => ProviderConsole {
            name: "Azure Portal",
            credentials_url:
                "https://portal.azure.com/#view/Microsoft_AAD_RegisteredApps/ApplicationsListBlade",
            requires_origin: false,
            redirect_label: "Redirect URIs (Web platform)",
        },
    }
}

/// `<url>/auth/v1/callback` with any trailing slash on `url` removed.
pub fn supabase_callback_url(url: &str) -> String {
    format!("{}{SUPABASE_CALLBACK_PATH}", url.trim_end_matches('/'))
}
