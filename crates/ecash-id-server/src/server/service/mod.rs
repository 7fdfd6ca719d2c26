//! HTTP service implementation.
//!
//! ## Structure
//!
//! - [`state`] - shared generator, store and clock (`AppState`).
//! - [`handler`] - route handlers and the [`handler::router`].

pub mod handler;
pub mod state;
