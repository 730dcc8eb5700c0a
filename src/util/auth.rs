//! Shared auth routing helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every entry point applies the same unauthenticated redirect so a stale
//! or missing session always lands on the login page.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::routes::Page;
use crate::state::auth::AuthState;

/// True when `page` is protected and `state` holds no session.
#[must_use]
pub fn should_redirect_unauth(page: Page, state: &AuthState) -> bool {
    page.requires_auth() && !state.is_authenticated()
}

/// The page to actually show for a request to `page`.
#[must_use]
pub fn resolve(page: Page, state: &AuthState) -> Page {
    if should_redirect_unauth(page, state) {
        tracing::debug!(requested = %page, "redirecting anonymous session to login");
        Page::Login
    } else {
        page
    }
}
