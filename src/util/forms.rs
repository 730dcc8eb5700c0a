//! Local form validation for the account flows.
//!
//! Each form validates into the request DTO it feeds, so nothing reaches the
//! pipeline until every check passes. Checks run in the order a browser form
//! would surface them: every required field, then field shape, then
//! confirmation.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use crate::net::types::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

/// Maximum OTP length accepted by the reset form.
pub const OTP_MAX_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("OTP must be at most 6 characters")]
    OtpTooLong,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Nothing to update")]
    NothingToUpdate,
}

fn required<'a>(label: &'static str, value: &'a str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() { Err(FormError::Required(label)) } else { Ok(trimmed) }
}

/// Passwords keep surrounding whitespace; only an all-blank value is missing.
fn required_secret<'a>(label: &'static str, value: &'a str) -> Result<&'a str, FormError> {
    if value.trim().is_empty() { Err(FormError::Required(label)) } else { Ok(value) }
}

/// Shape check for an email already trimmed by [`required`].
fn email_shape(value: &str) -> Result<String, FormError> {
    if !is_valid_email(value) {
        return Err(FormError::InvalidEmail);
    }
    Ok(value.to_owned())
}

/// `local@domain` with no whitespace and no empty domain labels.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').all(|label| !label.is_empty())
}

// =============================================================================
// FORMS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns the first failing check as a [`FormError`].
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        let first_name = required("First Name", &self.first_name)?;
        let last_name = required("Last Name", &self.last_name)?;
        let email = required("Email", &self.email)?;
        let mobile_number = required("Mobile Number", &self.mobile_number)?;
        let password = required_secret("Password", &self.password)?;
        required_secret("Confirm Password", &self.confirm_password)?;
        let email = email_shape(email)?;
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(RegisterRequest {
            email,
            password: password.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            mobile_number: mobile_number.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the first failing check as a [`FormError`].
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        let email = required("Email", &self.email)?;
        let password = required_secret("Password", &self.password)?;
        Ok(LoginRequest { email: email_shape(email)?, password: password.to_owned() })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    /// # Errors
    ///
    /// Returns the first failing check as a [`FormError`].
    pub fn validate(&self) -> Result<ForgotPasswordRequest, FormError> {
        let email = required("Email Address", &self.email)?;
        Ok(ForgotPasswordRequest { email: email_shape(email)? })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// # Errors
    ///
    /// Returns the first failing check as a [`FormError`].
    pub fn validate(&self) -> Result<ResetPasswordRequest, FormError> {
        let email = required("Email Address", &self.email)?;
        let otp = required("OTP", &self.otp)?;
        let new_password = required_secret("New Password", &self.new_password)?;
        required_secret("Confirm Password", &self.confirm_password)?;
        let email = email_shape(email)?;
        if otp.chars().count() > OTP_MAX_LEN {
            return Err(FormError::OtpTooLong);
        }
        if self.new_password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(ResetPasswordRequest { email, otp: otp.to_owned(), new_password: new_password.to_owned() })
    }
}

/// Profile edits from the dashboard. Blank fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns [`FormError::NothingToUpdate`] when every field is blank.
    pub fn validate(&self) -> Result<UpdateProfileRequest, FormError> {
        let request = UpdateProfileRequest {
            first_name: optional(&self.first_name),
            last_name: optional(&self.last_name),
            mobile_number: optional(&self.mobile_number),
        };
        if request.is_empty() {
            return Err(FormError::NothingToUpdate);
        }
        Ok(request)
    }
}
