//! REST pipeline for the `/users` endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! One shared `reqwest::Client` per process. Before each dispatch the
//! pipeline reads the session token from the injected [`SessionStore`] and,
//! when one is held, sends it as `Authorization: Bearer <token>`.
//!
//! ERROR HANDLING
//! ==============
//! No retries and no status interpretation beyond success/failure. The
//! pipeline never writes to the session; callers decide what a successful
//! login or a rejected credential means.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    Acknowledgement, ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, User,
};
use crate::config::ClientConfig;
use crate::state::auth::SessionStore;

/// Backend capabilities exposed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    GetProfile,
    ForgotPassword,
    ResetPassword,
    UpdateProfile,
    DeleteAccount,
}

impl Operation {
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::GetProfile => Method::GET,
            Self::Register | Self::Login | Self::ForgotPassword | Self::ResetPassword => Method::POST,
            Self::UpdateProfile => Method::PUT,
            Self::DeleteAccount => Method::DELETE,
        }
    }

    /// Path relative to the configured base URL.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Register => "/users/register",
            Self::Login => "/users/login",
            Self::GetProfile | Self::UpdateProfile | Self::DeleteAccount => "/users/me",
            Self::ForgotPassword => "/users/forgot-password",
            Self::ResetPassword => "/users/reset-password",
        }
    }

    /// Message shown when the backend gives no usable detail.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Register => "Registration failed",
            Self::Login => "Login failed",
            Self::GetProfile => "Failed to load profile",
            Self::ForgotPassword => "Failed to send OTP",
            Self::ResetPassword => "Failed to reset password",
            Self::UpdateProfile => "Failed to update profile",
            Self::DeleteAccount => "Failed to delete account",
        }
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(ApiError::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Shared HTTP client bound to one backend and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client for `config.api_base_url` that reads credentials from `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(ApiError::HttpClientBuild)?;
        Ok(Self { http, base_url: config.api_base_url.clone(), session })
    }

    /// The session this client reads credentials from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /users/register`. Returns the created user.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, rejection, or a malformed payload.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.send(Operation::Register, Some(request)).await
    }

    /// `POST /users/login`. Does not touch the session; see [`crate::pages::login`].
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, rejection, or a malformed payload.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send(Operation::Login, Some(request)).await
    }

    /// `GET /users/me` with the current credential.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, rejection, or a malformed payload.
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.send::<(), _>(Operation::GetProfile, None).await
    }

    /// `POST /users/forgot-password`. The backend issues an OTP out of band.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, rejection, or a malformed payload.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<Acknowledgement, ApiError> {
        self.send(Operation::ForgotPassword, Some(request)).await
    }

    /// `POST /users/reset-password`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, rejection, or a malformed payload.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Acknowledgement, ApiError> {
        self.send(Operation::ResetPassword, Some(request)).await
    }

    /// `PUT /users/me`. Returns the updated user; the cached session user is
    /// left for the caller to refresh.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, rejection, or a malformed payload.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User, ApiError> {
        self.send(Operation::UpdateProfile, Some(request)).await
    }

    /// `DELETE /users/me`. Does not log out; see [`crate::pages::dashboard`].
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, rejection, or a malformed payload.
    pub async fn delete_account(&self) -> Result<Acknowledgement, ApiError> {
        self.send::<(), _>(Operation::DeleteAccount, None).await
    }

    /// Attach the current session token, if any.
    fn authorize(&self, request: RequestBuilder) -> Result<(RequestBuilder, bool), ApiError> {
        match self.session.token() {
            Some(token) => Ok((request.header(AUTHORIZATION, bearer_header(&token)?), true)),
            None => Ok((request, false)),
        }
    }

    async fn send<B, T>(&self, operation: Operation, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, operation.path());
        let request = self.http.request(operation.method(), &url);
        let request = match body {
            Some(json) => request.json(json),
            None => request,
        };
        let (request, credentialed) = self.authorize(request)?;

        tracing::debug!(?operation, %url, credentialed, "dispatching request");
        let response = request
            .send()
            .await
            .map_err(|source| {
                tracing::warn!(?operation, error = %source, "request failed before response");
                ApiError::Transport { operation, source }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| {
                tracing::warn!(?operation, status = status.as_u16(), error = %source, "response body unreadable");
                ApiError::Transport { operation, source }
            })?;

        if !status.is_success() {
            let error = ApiError::from_response(operation, status.as_u16(), &text);
            tracing::warn!(?operation, status = status.as_u16(), error = %error, "request rejected");
            return Err(error);
        }

        serde_json::from_str(&text).map_err(|source| {
            tracing::warn!(?operation, error = %source, "unexpected response payload");
            ApiError::Decode { operation, source }
        })
    }
}
