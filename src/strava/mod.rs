//! Strava integration: API client and OAuth token lifecycle.
//!
//! The lifecycle produces ready-to-use [`StravaClient`] handles from the
//! credential store, refreshing expired tokens transparently:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       TokenLifecycle                     │
//! │  - load stored tokens                    │
//! │  - refresh when expired, persist         │
//! │  - connectivity probe                    │
//! └─────────────────────────────────────────┘
//!        ↓ load/save              ↓ returns
//! ┌──────────────────┐   ┌──────────────────┐
//! │ CredentialStore  │   │   StravaClient   │
//! │  (api_tokens)    │   │  (bearer calls)  │
//! └──────────────────┘   └──────────────────┘
//! ```

mod api;
mod auth;
mod config;

pub use api::{ActivitySummary, ApiError, Athlete, StravaClient};
pub use auth::{AuthError, ConnectionStatus, TokenLifecycle};
pub use config::{StravaSettings, AUTH_URL, BASE_URL, SCOPES, SERVICE, TOKEN_URL};
