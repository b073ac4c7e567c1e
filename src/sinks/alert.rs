//! Alert collaborator boundary
//!
//! Error-and-above records can be forwarded to an alerting collaborator
//! (mail gateway, pager, webhook). Delivery is best-effort: a failing sink
//! is counted and reported on stderr, and must never block or fail the
//! primary write path.

use crate::core::error::Result;

pub trait AlertSink: Send + Sync {
    /// Deliver one rendered record text.
    fn send_alert(&self, text: &str) -> Result<()>;

    fn name(&self) -> &str {
        "alert"
    }
}
