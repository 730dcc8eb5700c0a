//! Registration flow. Creating an account does not log it in.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use super::PageError;
use crate::net::api::ApiClient;
use crate::net::types::User;
use crate::routes::{Page, Redirect};
use crate::util::forms::RegisterForm;

pub const REGISTERED_NOTICE: &str = "Registration successful! Please login.";

/// Create the account and send the user to the login page.
///
/// # Errors
///
/// Returns [`PageError::Form`] before any request when the form is invalid
/// (including mismatched passwords) and [`PageError::Api`] otherwise.
pub async fn submit(api: &ApiClient, form: &RegisterForm) -> Result<(User, Redirect), PageError> {
    let request = form.validate()?;
    let created = api.register(&request).await?;
    tracing::info!(user_id = %created.id, "account registered");
    Ok((created, Redirect::to(Page::Login).with_notice(REGISTERED_NOTICE)))
}
