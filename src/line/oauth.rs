//! Channel access token endpoints of the LINE OAuth API.
//!
//! These calls authenticate with form fields only. The short-lived token is
//! issued with the client credentials grant, so no browser or redirect is
//! involved.

use async_trait::async_trait;

use crate::{
    line::{ApiError, LineClient},
    types::{IssueTokenResponse, Received, VerifyTokenResponse},
};

/// Channel access token lifecycle.
#[async_trait]
pub trait OAuthApi: Send + Sync {
    /// Issues a short-lived channel access token with the client credentials grant.
    async fn issue_token(
        &self,
        channel_id: &str,
        channel_secret: &str,
    ) -> Result<Received<IssueTokenResponse>, ApiError>;

    /// Revokes a channel access token. The API answers with an empty body.
    async fn revoke_token(&self, access_token: &str) -> Result<(), ApiError>;

    /// Returns the channel and remaining lifetime of a channel access token.
    async fn verify_token(
        &self,
        access_token: &str,
    ) -> Result<Received<VerifyTokenResponse>, ApiError>;
}

#[async_trait]
impl OAuthApi for LineClient {
    /// Requests a new channel access token.
    ///
    /// Posts `grant_type=client_credentials` with the channel ID and secret to
    /// `/v2/oauth/accessToken`.
    ///
    /// # Arguments
    ///
    /// * `channel_id` - Channel ID from the LINE Developers console
    /// * `channel_secret` - Channel secret of the same channel
    ///
    /// # Returns
    ///
    /// The token, its type and its lifetime in seconds. Persisting it is up to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Wrong credentials come back as [`ApiError::Status`] with the API's
    /// error body.
    async fn issue_token(
        &self,
        channel_id: &str,
        channel_secret: &str,
    ) -> Result<Received<IssueTokenResponse>, ApiError> {
        let request = self.http.post(self.url("/v2/oauth/accessToken")).form(&[
            ("grant_type", "client_credentials"),
            ("client_id", channel_id),
            ("client_secret", channel_secret),
        ]);
        self.fetch_json(request, "Issuing channel access token...")
            .await
    }

    /// Invalidates a channel access token via `/v2/oauth/revoke`.
    ///
    /// Revoking a token that is already invalid is not an error on the API
    /// side.
    async fn revoke_token(&self, access_token: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.url("/v2/oauth/revoke"))
            .form(&[("access_token", access_token)]);
        self.fetch_empty(request, "Revoking channel access token...")
            .await
    }

    /// Checks a channel access token via `/v2/oauth/verify`.
    ///
    /// # Returns
    ///
    /// The channel the token belongs to (`client_id`), its scope and the
    /// seconds left until it expires.
    async fn verify_token(
        &self,
        access_token: &str,
    ) -> Result<Received<VerifyTokenResponse>, ApiError> {
        let request = self
            .http
            .post(self.url("/v2/oauth/verify"))
            .form(&[("access_token", access_token)]);
        self.fetch_json(request, "Verifying channel access token...")
            .await
    }
}
