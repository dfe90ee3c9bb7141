//! Checkout orchestration: one attempt, one terminal outcome.
//!
//! The orchestrator drives `Idle -> Submitting -> {Redirecting |
//! Fallback} -> Idle`. Whatever the payment backend does, control
//! always comes back to `Idle`; the front end is never left stuck in a
//! processing state. A failed attempt is not retried; resubmission is
//! a user decision.

mod gateway;

pub use gateway::{
    CheckoutGateway, CheckoutRequest, CheckoutSession, Customer, GatewayError, HttpGateway,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::analytics::{AnalyticsSink, NoopSink};
use crate::cart::CartItem;
use crate::pricing::{Destination, compute_totals};

/// Message for the manual-payment fallback path.
pub const PAYMENT_UNAVAILABLE_MESSAGE: &str =
    "Payment system unavailable. Please contact us to complete your order.";

/// Why a submission was rejected before any network call was made.
///
/// The `Display` text doubles as the user-facing message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Entry guard: an empty cart has nothing to check out.
    #[error("Your cart is empty. Add items from Shop.")]
    EmptyCart,

    /// Re-entrancy guard: at most one in-flight attempt per session.
    #[error("a checkout attempt is already in progress")]
    InFlight,
}

/// Terminal outcome of one checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The backend produced a hosted checkout session; navigate there.
    Redirected {
        checkout_url: String,
    },
    /// The backend could not be reached or did not produce a session;
    /// surface the manual payment path.
    Fallback {
        reason: GatewayError,
    },
}

/// Drives checkout attempts against a [`CheckoutGateway`].
pub struct CheckoutOrchestrator<G> {
    gateway: G,
    analytics: Arc<dyn AnalyticsSink>,
    in_flight: AtomicBool,
}

impl<G: CheckoutGateway> CheckoutOrchestrator<G> {
    /// Create an orchestrator over `gateway` with no analytics.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            analytics: Arc::new(NoopSink),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Attach an analytics sink (replaces the no-op default).
    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    /// Whether an attempt is currently in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one checkout attempt over a snapshot of the cart.
    ///
    /// Shipping is computed from the snapshot with the same pricing
    /// function the live summary uses. Cart edits made while the call
    /// is suspended do not reach the request.
    ///
    /// # Errors
    ///
    /// [`SubmitError::EmptyCart`] and [`SubmitError::InFlight`] reject
    /// the submission before any network traffic; both leave the
    /// orchestrator `Idle` and emit no attempt event.
    #[tracing::instrument(skip_all, fields(lines = items.len()))]
    pub async fn submit(
        &self,
        items: &[CartItem],
        destination: Destination,
        gift_wrap: bool,
        customer: Customer,
    ) -> Result<CheckoutOutcome, SubmitError> {
        if items.is_empty() {
            return Err(SubmitError::EmptyCart);
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(SubmitError::InFlight);
        }
        // Released on every exit path below, including panics.
        let _guard = InFlightGuard(&self.in_flight);

        let totals = compute_totals(items, destination, gift_wrap);
        let request = CheckoutRequest {
            cart: items.to_vec(),
            shipping: totals.shipping,
            gift_wrap,
            customer,
        };

        let outcome = match self.gateway.create_checkout(&request).await {
            Ok(session) => {
                self.analytics.track(
                    "checkout_redirect",
                    &[("total", totals.total.amount().to_string())],
                );
                CheckoutOutcome::Redirected {
                    checkout_url: session.checkout_url,
                }
            }
            Err(reason) => {
                tracing::error!(error = %reason, "Checkout failed, offering manual payment fallback");
                CheckoutOutcome::Fallback { reason }
            }
        };

        // Attempt event fires regardless of outcome.
        self.analytics.track("checkout_submit", &[]);

        Ok(outcome)
    }
}

/// Clears the in-flight flag when the attempt ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
