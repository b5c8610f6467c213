//! Per-connection session state.
//!
//! A session spans one client connection. It owns the two pieces of state
//! shared by the concurrent parts of a research run:
//!
//! - [`channel::SessionChannel`] - the ordered delivery queue between the
//!   many concurrent pipeline stages and the single client transport
//! - [`visited::VisitedUrls`] - the set of URLs already claimed for
//!   scraping, consulted by every concurrent gather
//!
//! Both are confined to their session and discarded when the connection
//! closes. Neither is ever shared across sessions.

pub mod channel;
pub mod visited;

pub use channel::{DeliveryMessage, ExportPaths, MessageSink, SessionChannel, UsageReport};
pub use visited::VisitedUrls;
