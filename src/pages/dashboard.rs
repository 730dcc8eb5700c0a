//! Dashboard flow: show the signed-in profile, or send the user to login.
//!
//! The profile is fetched fresh on every load and falls back to the user
//! cached in the session when the fetch fails. A 401 means the stored token
//! is no longer accepted; the session is cleared so later commands stop
//! sending it. Profile edits and account deletion apply the same rule.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::fmt::Write as _;

use super::PageError;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::User;
use crate::routes::{Page, Redirect};
use crate::state::auth::SessionStore;
use crate::util::auth::resolve;
use crate::util::forms::ProfileForm;

pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please login again.";
pub const ACCOUNT_DELETED_NOTICE: &str = "Your account has been deleted.";

const PLACEHOLDER: &str = "-";

/// Where the displayed profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Server,
    Cached,
}

/// Display-ready dashboard fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub display_name: String,
    pub initial: char,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub role: String,
    pub status: String,
    pub source: ProfileSource,
    /// Why the cached profile is shown instead of a fresh one.
    pub warning: Option<String>,
}

fn or_placeholder(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() { PLACEHOLDER.to_owned() } else { value.to_owned() }
}

impl DashboardView {
    #[must_use]
    pub fn from_user(user: &User, source: ProfileSource) -> Self {
        let first_name = user.first_name.trim();
        let display_name = if first_name.is_empty() { "User".to_owned() } else { first_name.to_owned() };
        let initial = first_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U');
        Self {
            display_name,
            initial,
            email: or_placeholder(&user.email),
            first_name: or_placeholder(&user.first_name),
            last_name: or_placeholder(&user.last_name),
            mobile_number: or_placeholder(&user.mobile_number),
            role: or_placeholder(&user.role),
            status: or_placeholder(&user.status),
            source,
            warning: None,
        }
    }

    /// Plain-text rendering for the terminal.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[{}] Welcome, {}!", self.initial, self.display_name);
        let _ = writeln!(out, "Logged in as {}", self.email);
        if let Some(warning) = &self.warning {
            let _ = writeln!(out, "(showing saved profile: {warning})");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Profile Information");
        for (label, value) in [
            ("First Name", &self.first_name),
            ("Last Name", &self.last_name),
            ("Email", &self.email),
            ("Mobile", &self.mobile_number),
            ("Role", &self.role),
            ("Status", &self.status),
        ] {
            let _ = writeln!(out, "  {label:<11} {value}");
        }
        out
    }
}

/// Result of opening the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardOutcome {
    Show(DashboardView),
    Redirect(Redirect),
}

/// Load the dashboard for the current session.
pub async fn load(api: &ApiClient) -> DashboardOutcome {
    let snapshot = api.session().snapshot();
    if resolve(Page::Dashboard, &snapshot) != Page::Dashboard {
        return DashboardOutcome::Redirect(Redirect::to(Page::Login));
    }

    match api.get_profile().await {
        Ok(profile) => DashboardOutcome::Show(DashboardView::from_user(&profile, ProfileSource::Server)),
        Err(e) if e.is_unauthorized() => {
            expire_session(api, &e);
            DashboardOutcome::Redirect(Redirect::to(Page::Login).with_notice(SESSION_EXPIRED_NOTICE))
        }
        Err(e) => match snapshot.user() {
            Some(user) => {
                let mut view = DashboardView::from_user(user, ProfileSource::Cached);
                view.warning = Some(e.to_string());
                DashboardOutcome::Show(view)
            }
            None => DashboardOutcome::Redirect(Redirect::to(Page::Login)),
        },
    }
}

fn expire_session(api: &ApiClient, error: &ApiError) {
    tracing::warn!(error = %error, "stored credential rejected; clearing session");
    api.session().logout();
}

/// Save profile edits and refresh the cached session user.
///
/// # Errors
///
/// Returns [`PageError::Form`] before any request when nothing changed and
/// [`PageError::Api`] when the backend refuses the edit. A 401 also clears
/// the session.
pub async fn update_profile(api: &ApiClient, form: &ProfileForm) -> Result<DashboardView, PageError> {
    let request = form.validate()?;
    let user = match api.update_profile(&request).await {
        Ok(user) => user,
        Err(e) => {
            if e.is_unauthorized() {
                expire_session(api, &e);
            }
            return Err(e.into());
        }
    };
    if let Some(token) = api.session().token() {
        api.session().set_auth(token, user.clone())?;
    }
    Ok(DashboardView::from_user(&user, ProfileSource::Server))
}

/// Delete the account, then sign out.
///
/// # Errors
///
/// Returns [`PageError::Api`] when the backend refuses; the session is kept
/// unless the refusal was a 401.
pub async fn delete_account(api: &ApiClient) -> Result<Redirect, PageError> {
    if let Err(e) = api.delete_account().await {
        if e.is_unauthorized() {
            expire_session(api, &e);
        }
        return Err(e.into());
    }
    api.session().logout();
    Ok(Redirect::to(Page::Login).with_notice(ACCOUNT_DELETED_NOTICE))
}

/// Sign out and return to the login page.
pub fn logout(session: &SessionStore) -> Redirect {
    session.logout();
    Redirect::to(Page::Login)
}
