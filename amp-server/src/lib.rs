//! HTTP JSON transport for the amplifier command engine
//!
//! Two routes, both mapping 1:1 onto the engine:
//!
//! | Method | Path   | Body             | Response                          |
//! |--------|--------|------------------|-----------------------------------|
//! | GET    | `/api` |                  | current state                     |
//! | POST   | `/api` | command envelope | `null`, or `{"error", "kind"}`    |
//!
//! Failed commands carry a status code derived from their error kind:
//! 404 for `not_found`, 400 for `validation` and `unknown_command`, and 502
//! for `hardware`. The body is the same error reply a direct caller gets.

mod error;
mod routes;
mod server;

pub use error::ServerError;
pub use routes::{routes, status_for};
pub use server::ApiServer;
