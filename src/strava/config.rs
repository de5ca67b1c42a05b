use serde::Deserialize;

pub const BASE_URL: &str = "https://www.strava.com/api/v3";
pub const AUTH_URL: &str = "https://www.strava.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Service name used as the credential partition key.
pub const SERVICE: &str = "Strava";

/// Scopes requested when connecting a Strava account.
pub const SCOPES: &[&str] = &[
    "read",
    "read_all",
    "profile:read_all",
    "profile:write",
    "activity:read",
    "activity:read_all",
    "activity:write",
];

/// Strava OAuth application settings.
///
/// Read once at startup from the `[strava]` config section and passed by
/// reference; nothing reads these ambiently.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl StravaSettings {
    /// Builds the user-facing authorization URL for the "connect" link.
    ///
    /// Strava expects a comma-separated scope list.
    pub fn authorization_url(&self) -> String {
        let scopes = SCOPES.join(",");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&approval_prompt=auto&scope={}",
            AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scopes)
        )
    }
}
