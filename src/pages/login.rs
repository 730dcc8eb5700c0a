//! Login flow: credentials in, session established, dashboard next.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::PageError;
use crate::net::api::ApiClient;
use crate::net::types::User;
use crate::routes::{Page, Redirect};
use crate::util::forms::LoginForm;

/// Authenticate and store the returned session.
///
/// # Errors
///
/// Returns [`PageError::Form`] before any request when the form is invalid,
/// [`PageError::Api`] when the backend rejects the login, and
/// [`PageError::Session`] when it returns an unusable credential.
pub async fn submit(api: &ApiClient, form: &LoginForm) -> Result<(User, Redirect), PageError> {
    let request = form.validate()?;
    let response = api.login(&request).await?;
    api.session().set_auth(response.access_token, response.user.clone())?;
    Ok((response.user, Redirect::to(Page::Dashboard)))
}
