use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// External identity providers the authorize probe knows how to recognise.
pub enum OAuthProvider {
    Google,
    Github,
    Azure,
}

impl OAuthProvider {
    /// Identifier used by Supabase in `external.<id>` and `?provider=<id>`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Azure => "azure",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
            Self::Azure => "Azure",
        }
    }

    /// Substring expected in the authorize redirect `Location`.
    pub fn identity_domain(self) -> &'static str {
        match self {
            Self::Google => "accounts.google.com",
            Self::Github => "github.com/login/oauth",
            Self::Azure => "login.microsoftonline.com",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
