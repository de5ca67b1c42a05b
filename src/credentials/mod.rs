//! Encrypted credential storage for OAuth tokens.
//!
//! Persists the token tuple for each external service in the warehouse's
//! `api_tokens` table: one live record per service, replaced wholesale on
//! every refresh. Payloads are serialized as JSON and encrypted at rest
//! with AES-256-GCM.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitals::credentials::{CredentialStore, TokenPayload};
//! use vitals::db::Warehouse;
//!
//! # fn main() -> anyhow::Result<()> {
//! let warehouse = Arc::new(Warehouse::open("vitals.db")?);
//! let store = CredentialStore::new(warehouse, "base64-master-key")?;
//!
//! store.save(
//!     "Strava",
//!     &TokenPayload {
//!         access_token: "abc".to_string(),
//!         refresh_token: "def".to_string(),
//!         expires_at: 1_700_000_000,
//!     },
//! )?;
//!
//! if let Some(tokens) = store.load("Strava") {
//!     println!("Access token: {}", tokens.access_token);
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

mod encryption;
mod store;

pub use store::{CredentialStore, StoreError};

// Re-exported for utilities that need to seal/open payloads directly
pub use encryption::TokenCipher;

/// Decoded token tuple for one external service.
///
/// The in-memory form of a credential record. Held transiently by the
/// token lifecycle while constructing a client; never cached across calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// OAuth access token (used for API requests)
    pub access_token: String,

    /// OAuth refresh token (used to obtain new access tokens)
    pub refresh_token: String,

    /// When the access token expires (epoch seconds, UTC)
    pub expires_at: i64,
}
