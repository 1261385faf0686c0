//! Configuration management for the Spotify Release Day CLI.
//!
//! Configuration values come from environment variables and an optional `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Client credentials are never compiled into the binary. They must be provided
//! through one of the sources above.

use std::{env, path::PathBuf};

use crate::{Error, Res, management::StoreMode};

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from `spordcli/.env` in the local data directory.
///
/// Creates the directory if needed. A missing `.env` file is not an error, the
/// process environment is used as is.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spordcli/.env`
/// - macOS: `~/Library/Application Support/spordcli/.env`
/// - Windows: `%LOCALAPPDATA%/spordcli/.env`
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spordcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    }
    Ok(())
}

fn required(name: &str) -> Res<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{name} must be set"))),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Returns the Spotify API client ID (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify API client secret (`SPOTIFY_API_AUTH_CLIENT_SECRET`).
///
/// The secret should be kept confidential and never exposed in logs or version
/// control.
pub fn spotify_client_secret() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
///
/// Defaults to `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the token exchange URL (`SPOTIFY_API_TOKEN_URL`).
///
/// Defaults to `https://accounts.spotify.com/api/token`.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the signed-in user (`SPORDCLI_USER_ID`), if any.
pub fn user_id() -> Option<String> {
    optional("SPORDCLI_USER_ID")
}

/// Returns the configured release store (`SPORDCLI_STORE`), `remote` by default.
pub fn store_mode() -> Res<StoreMode> {
    match optional("SPORDCLI_STORE") {
        Some(value) => value.parse(),
        None => Ok(StoreMode::Remote),
    }
}

/// Returns the root directory for cached data.
///
/// `SPORDCLI_DATA_DIR` if set, otherwise `spordcli` under the platform local
/// data directory.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = optional("SPORDCLI_DATA_DIR") {
        return PathBuf::from(dir);
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spordcli");
    path
}

/// Returns the diagnostic log filter (`SPORDCLI_LOG`), `warn` by default.
pub fn log_filter() -> String {
    optional("SPORDCLI_LOG").unwrap_or_else(|| "warn".to_string())
}
