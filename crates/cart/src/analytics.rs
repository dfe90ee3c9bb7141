//! Fire-and-forget analytics event sink.
//!
//! The shop emits best-effort behavioral events (`add_to_cart`,
//! `cart_decrease`, `checkout_submit`, `checkout_redirect`). Emission
//! must never fail, block, or be retried; a missing or broken sink is a
//! normal, silent condition.

/// A best-effort sink for behavioral events.
///
/// Implementations must swallow their own failures; callers treat
/// `track` as infallible and never await a delivery confirmation.
pub trait AnalyticsSink: Send + Sync {
    /// Record an event with a flat set of key/value parameters.
    fn track(&self, event: &str, params: &[(&str, String)]);
}

/// Sink that discards every event.
///
/// The default when no analytics backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn track(&self, _event: &str, _params: &[(&str, String)]) {}
}

/// Sink that logs events through `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn track(&self, event: &str, params: &[(&str, String)]) {
        tracing::debug!(target: "mage_cart::analytics", event, ?params, "track");
    }
}
