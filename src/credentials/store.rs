//! Credential persistence against the warehouse's `api_tokens` table.

use super::{encryption::TokenCipher, TokenPayload};
use crate::db::Warehouse;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::params;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Failure writing a credential record.
///
/// Read-side failures never surface: `load` degrades to "no credentials",
/// and a lost or corrupt record triggers a fresh OAuth flow upstream.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage connection or write failed
    #[error("credential storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),

    /// Payload could not be serialized or sealed
    #[error("failed to encode credential record: {0}")]
    Encode(String),
}

/// Encrypted credential storage, one live record per service.
///
/// # Schema
/// ```sql
/// CREATE TABLE api_tokens (
///     date_utc TEXT NOT NULL,   -- RFC 3339 timestamp of last write
///     service TEXT NOT NULL UNIQUE,
///     tokens TEXT NOT NULL,     -- Encrypted JSON payload
///     nonce TEXT NOT NULL       -- Nonce for tokens
/// );
/// ```
///
/// The UNIQUE constraint plus upsert keeps the "zero or one record per
/// service" invariant without a delete/insert window.
pub struct CredentialStore {
    warehouse: Arc<Warehouse>,
    cipher: TokenCipher,
}

impl CredentialStore {
    /// Creates a store over an open warehouse.
    ///
    /// # Arguments
    /// * `warehouse` - Warehouse holding the `api_tokens` table
    /// * `encryption_key` - Base64-encoded 32-byte master key
    pub fn new(warehouse: Arc<Warehouse>, encryption_key: &str) -> Result<Self> {
        let cipher = TokenCipher::new(encryption_key).context("Invalid encryption key")?;
        Ok(Self { warehouse, cipher })
    }

    /// Loads the current token payload for a service.
    ///
    /// Returns `None` when no record exists, and also when the stored
    /// record cannot be read, decrypted, or decoded. A malformed record
    /// is logged and treated as "no credentials available", never raised.
    pub fn load(&self, service: &str) -> Option<TokenPayload> {
        let row = {
            let conn = self.warehouse.connection();
            conn.query_row(
                "SELECT tokens, nonce FROM api_tokens WHERE service = ?1",
                params![service],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
        };

        let (sealed, nonce) = match row {
            Ok(pair) => pair,
            Err(rusqlite::Error::QueryReturnedNoRows) => return None,
            Err(e) => {
                error!(service = %service, error = %e, "Failed to read credential record");
                return None;
            }
        };

        let json = match self.cipher.open(&sealed, &nonce) {
            Ok(json) => json,
            Err(e) => {
                error!(service = %service, error = %e, "Failed to decrypt credential record");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(payload) => Some(payload),
            Err(e) => {
                error!(service = %service, error = %e, "Malformed credential record");
                None
            }
        }
    }

    /// Replaces the token payload for a service.
    ///
    /// Upserts on the service key with `date_utc = now (UTC)`: after a
    /// successful save exactly one record exists for the service, carrying
    /// the given payload. The write is a single statement, so there is no
    /// window in which the service has zero or two records.
    pub fn save(&self, service: &str, payload: &TokenPayload) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(payload).map_err(|e| StoreError::Encode(e.to_string()))?;
        let (sealed, nonce) = self
            .cipher
            .seal(&json)
            .map_err(|e| StoreError::Encode(e.to_string()))?;

        let now = Utc::now().to_rfc3339();

        let conn = self.warehouse.connection();
        conn.execute(
            r#"
            INSERT INTO api_tokens (date_utc, service, tokens, nonce)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(service) DO UPDATE SET
                date_utc = excluded.date_utc,
                tokens = excluded.tokens,
                nonce = excluded.nonce
            "#,
            params![now, service, sealed, nonce],
        )?;

        debug!(service = %service, "Stored credential record");
        Ok(())
    }

    /// Lists the services that currently have a stored credential record.
    pub fn list_services(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.warehouse.connection();
        let mut stmt = conn.prepare("SELECT service FROM api_tokens ORDER BY service")?;
        let services = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(services)
    }
}
