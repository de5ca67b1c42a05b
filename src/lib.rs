// Configuration loading
pub mod config;

// Warehouse database and schema
pub mod db;

// Encrypted credential storage
pub mod credentials;

// Strava API client and token lifecycle
pub mod strava;
