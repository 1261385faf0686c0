use reqwest::Client;
use tracing::debug;

use crate::{Error, Res, types::TokenResponse};

/// Exchanges the application's client credentials for an access token.
///
/// Sends `grant_type=client_credentials` to the token endpoint, authenticated
/// with HTTP Basic auth built from the client ID and secret. The token is not
/// tied to a user and only grants access to public catalog data, which is all
/// the release search needs.
///
/// # Arguments
///
/// * `client` - HTTP client to send the request with
/// * `token_url` - Token endpoint, e.g. `https://accounts.spotify.com/api/token`
/// * `client_id` - Client ID of the registered Spotify application
/// * `client_secret` - Client secret of the registered Spotify application
///
/// # Errors
///
/// Returns [`Error::Auth`] when the request cannot be sent, the response body
/// is not JSON, or it carries no `access_token`. There is no retry.
pub async fn client_credentials_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Res<String> {
    debug!(token_url, "requesting client credentials token");

    let response = client
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| Error::Auth(e.to_string()))?;

    let status = response.status();
    let json: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("unreadable token response ({status}): {e}")))?;

    match json.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::Auth(format!(
            "token response ({status}) contained no access token"
        ))),
    }
}
