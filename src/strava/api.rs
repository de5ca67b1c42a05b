use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::config::BASE_URL;

/// Remote-API failure from a Strava call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: token expired, revoked, or absent
    #[error("Strava auth error: token expired or invalid")]
    Unauthorized,

    /// 429: short-term or daily rate limit hit
    #[error("Strava rate limit exceeded (usage: {usage})")]
    RateLimited { usage: String },

    /// Any other non-2xx response
    #[error("Strava API error: {0}")]
    Status(StatusCode),

    /// Transport or response-decoding failure
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// The authenticated athlete, as returned by `GET /athlete`.
#[derive(Debug, Deserialize)]
pub struct Athlete {
    pub id: u64,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub weight: Option<f64>,
}

/// One activity from `GET /athlete/activities`.
#[derive(Debug, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub distance: f64,
    pub moving_time: i64,
    pub elapsed_time: i64,
    pub total_elevation_gain: f64,
    pub start_date: String,
    pub start_date_local: String,
    pub timezone: Option<String>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub average_watts: Option<f64>,
    pub kilojoules: Option<f64>,
}

/// HTTP client for the Strava v3 REST API.
///
/// Carries the OAuth token pair. An unauthenticated client (no tokens
/// set) performs its calls without an Authorization header and fails with
/// Strava's own 401; the "no credentials" case is not pre-validated here.
#[derive(Debug)]
pub struct StravaClient {
    access_token: Option<String>,
    refresh_token: Option<String>,
    http_client: Client,
    base_url: String,
}

impl StravaClient {
    /// Create an unauthenticated client against the real Strava API.
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    /// Create an unauthenticated client with a custom base URL (for
    /// testing with a mock server).
    pub fn with_base_url(base_url: String) -> Self {
        let http_client = Client::builder()
            .user_agent("vitals-warehouse/1.0")
            .build()
            .expect("Failed to build HTTP client");
        Self {
            access_token: None,
            refresh_token: None,
            http_client,
            base_url,
        }
    }

    /// Populates the OAuth token pair on this handle.
    pub fn set_tokens(&mut self, access_token: &str, refresh_token: &str) {
        self.access_token = Some(access_token.to_string());
        self.refresh_token = Some(refresh_token.to_string());
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Fetch the authenticated athlete ("who am I").
    pub async fn get_athlete(&self) -> Result<Athlete, ApiError> {
        let url = format!("{}/athlete", self.base_url);
        let response = self.authorize(self.http_client.get(&url)).send().await?;

        check_response_status(&response)?;
        Ok(response.json::<Athlete>().await?)
    }

    /// Fetch the athlete's activities, newest first.
    ///
    /// # Arguments
    /// * `after` - Only activities starting after this epoch second
    /// * `per_page` - Page size (Strava caps at 200)
    pub async fn list_activities(
        &self,
        after: Option<i64>,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, ApiError> {
        let mut url = format!(
            "{}/athlete/activities?per_page={}",
            self.base_url, per_page
        );
        if let Some(after) = after {
            url.push_str(&format!("&after={}", after));
        }

        let response = self.authorize(self.http_client.get(&url)).send().await?;

        check_response_status(&response)?;
        Ok(response.json::<Vec<ActivitySummary>>().await?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the response status and map known error codes.
///
/// - 401 → auth error (token expired or invalid)
/// - 429 → rate limit (logs X-RateLimit-Usage)
/// - Other non-2xx → generic API error
fn check_response_status(response: &reqwest::Response) -> Result<(), ApiError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => {
            let usage = response
                .headers()
                .get("X-RateLimit-Usage")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            Err(ApiError::RateLimited { usage })
        }
        s if !s.is_success() => Err(ApiError::Status(s)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn authed_client(base_url: String) -> StravaClient {
        let mut client = StravaClient::with_base_url(base_url);
        client.set_tokens("test_token", "test_refresh");
        client
    }

    #[tokio::test]
    async fn test_get_athlete() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/athlete")
            .match_header("authorization", "Bearer test_token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": 8712345,
                    "username": "roadrunner",
                    "firstname": "Road",
                    "lastname": "Runner",
                    "weight": 71.5
                }"#,
            )
            .create_async()
            .await;

        let client = authed_client(server.url());
        let athlete = client.get_athlete().await.unwrap();

        assert_eq!(athlete.id, 8712345);
        assert_eq!(athlete.username.as_deref(), Some("roadrunner"));
        assert_eq!(athlete.weight, Some(71.5));
    }

    #[tokio::test]
    async fn test_list_activities() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/athlete/activities?per_page=30&after=1672531200")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "id": 3110471562,
                    "name": "Morning Ride",
                    "type": "Ride",
                    "distance": 42195.0,
                    "moving_time": 5400,
                    "elapsed_time": 5700,
                    "total_elevation_gain": 480.0,
                    "start_date": "2023-01-15T07:00:00Z",
                    "start_date_local": "2023-01-15T08:00:00Z",
                    "timezone": "(GMT+01:00) Europe/Amsterdam",
                    "average_speed": 7.8,
                    "max_speed": 16.2,
                    "average_heartrate": 148.3,
                    "max_heartrate": 176.0,
                    "average_watts": 210.5,
                    "kilojoules": 1136.7
                }]"#,
            )
            .create_async()
            .await;

        let client = authed_client(server.url());
        let activities = client.list_activities(Some(1672531200), 30).await.unwrap();

        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, 3110471562);
        assert_eq!(activities[0].activity_type, "Ride");
        assert_eq!(activities[0].moving_time, 5400);
        assert_eq!(activities[0].average_watts, Some(210.5));
    }

    #[tokio::test]
    async fn test_401_maps_to_unauthorized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/athlete")
            .with_status(401)
            .with_body(r#"{"message": "Authorization Error"}"#)
            .create_async()
            .await;

        let client = authed_client(server.url());
        let err = client.get_athlete().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_429_maps_to_rate_limited() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/athlete")
            .with_status(429)
            .with_header("X-RateLimit-Usage", "605,12004")
            .with_body(r#"{"message": "Rate Limit Exceeded"}"#)
            .create_async()
            .await;

        let client = authed_client(server.url());
        let err = client.get_athlete().await.unwrap_err();
        match err {
            ApiError::RateLimited { usage } => assert_eq!(usage, "605,12004"),
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_client_sends_no_auth_header() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/athlete")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(401)
            .with_body(r#"{"message": "Authorization Error"}"#)
            .create_async()
            .await;

        let client = StravaClient::with_base_url(server.url());
        assert!(!client.is_authenticated());

        let err = client.get_athlete().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
