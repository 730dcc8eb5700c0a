//! Forgot-password flow: ask the backend to issue a reset OTP.

use super::PageError;
use crate::net::api::ApiClient;
use crate::routes::{Page, Redirect};
use crate::util::forms::ForgotPasswordForm;

pub const OTP_SENT_NOTICE: &str = "OTP sent to your email!";

/// Request an OTP and hand the email on to the reset page.
///
/// # Errors
///
/// Returns [`PageError::Form`] for an invalid email and [`PageError::Api`]
/// when the backend refuses (e.g. unknown account).
pub async fn submit(api: &ApiClient, form: &ForgotPasswordForm) -> Result<Redirect, PageError> {
    let request = form.validate()?;
    api.forgot_password(&request).await?;
    Ok(Redirect::to(Page::ResetPassword)
        .with_notice(OTP_SENT_NOTICE)
        .with_email(request.email))
}
