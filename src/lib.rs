//! # marquee
//!
//! Account client for the movie-ticketing backend. Drives the registration,
//! login, password-recovery and dashboard flows from the command line.
//!
//! The crate is split the way the flows use it: `state` owns the persisted
//! session, `net` is the request pipeline that reads it, `util` holds form
//! validation and the route guard, and `pages` glues those together into one
//! function per screen of the web client.

pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;
