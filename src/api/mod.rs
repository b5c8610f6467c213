//! Transport surface.
//!
//! One WebSocket endpoint drives research sessions; two static mounts
//! serve the client application and finished report exports.
//!
//! # Endpoints
//!
//! - `GET /ws` - research WebSocket. Send `start {json}` to begin a run;
//!   progress, usage, export paths and errors stream back as
//!   `{"type": ..., "output": ...}` frames.
//! - `GET /site/*` - the client application.
//! - `GET /outputs/*` - exported reports from previous runs.

/// Request handlers.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
