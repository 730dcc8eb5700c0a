//! Static page map shared by the flows and the CLI.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;

/// Every screen the client presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    Dashboard,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Login, Page::Register, Page::ForgotPassword, Page::ResetPassword, Page::Dashboard];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::Dashboard => "/dashboard",
        }
    }

    /// Look a page up by its path. `/` maps to the login page.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        if path == "/" {
            return Some(Self::Login);
        }
        Self::ALL.into_iter().find(|page| page.path() == path)
    }

    /// Pages only an authenticated session may see.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation requested by a flow once it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: Page,
    /// One-line banner for the destination page.
    pub notice: Option<&'static str>,
    /// Email carried from forgot-password into reset-password.
    pub email: Option<String>,
}

impl Redirect {
    #[must_use]
    pub fn to(page: Page) -> Self {
        Self { to: page, notice: None, email: None }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: &'static str) -> Self {
        self.notice = Some(notice);
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
