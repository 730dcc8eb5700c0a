//! Networking modules for the account REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the request pipeline, `error` classifies its failures, and
//! `types` defines the request/response schema shared with the backend.

pub mod api;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod test_server;
