//! Client-side state.
//!
//! DESIGN
//! ======
//! `auth` owns the session and is the only writer of its persisted record;
//! `storage` is the durable key-value capability it writes through.

pub mod auth;
pub mod storage;
