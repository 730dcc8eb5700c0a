//! Reset-password flow: OTP plus new password, confirmed locally.

#[cfg(test)]
#[path = "reset_password_test.rs"]
mod reset_password_test;

use super::PageError;
use crate::net::api::ApiClient;
use crate::routes::{Page, Redirect};
use crate::util::forms::ResetPasswordForm;

pub const RESET_NOTICE: &str = "Password reset successful! Please login.";

/// Reset the password and send the user back to login.
///
/// # Errors
///
/// Returns [`PageError::Form`] without contacting the backend when the
/// confirmation does not match, and [`PageError::Api`] when the backend
/// rejects the OTP.
pub async fn submit(api: &ApiClient, form: &ResetPasswordForm) -> Result<Redirect, PageError> {
    let request = form.validate()?;
    api.reset_password(&request).await?;
    Ok(Redirect::to(Page::Login).with_notice(RESET_NOTICE))
}
