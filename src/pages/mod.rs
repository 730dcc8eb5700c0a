//! One flow per screen of the web client.
//!
//! DESIGN
//! ======
//! A flow validates its form locally, calls the pipeline, applies any
//! session change the screen owns, and returns the [`Redirect`] the screen
//! would navigate to. Presentation (terminal output) stays in the binary.
//!
//! [`Redirect`]: crate::routes::Redirect

pub mod dashboard;
pub mod forgot_password;
pub mod login;
pub mod register;
pub mod reset_password;

use crate::net::error::ApiError;
use crate::state::auth::SessionError;
use crate::util::forms::FormError;

/// Failure of a flow. Displays the message a user should see.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Rejected locally; no request was sent.
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend returned credentials the session refused to hold.
    #[error(transparent)]
    Session(#[from] SessionError),
}
