//! HTTP API module
//!
//! RESTful surface consumed by the presentation layer. The recommendation
//! endpoint mirrors the router contract exactly:
//! `route(text) -> { output_text, recommendations: [{user_id, reason}] }`,
//! plus hydrated user cards for display.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use server::serve_api;
