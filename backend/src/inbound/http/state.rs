//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CheckoutCommand, CouponsQuery, OrdersQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub checkout: Arc<dyn CheckoutCommand>,
    pub orders: Arc<dyn OrdersQuery>,
    pub coupons: Arc<dyn CouponsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub checkout: Arc<dyn CheckoutCommand>,
    pub orders: Arc<dyn OrdersQuery>,
    pub coupons: Arc<dyn CouponsQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use market_backend::domain::ports::{
    ///     FixtureCheckoutCommand, FixtureCouponsQuery, FixtureOrdersQuery,
    /// };
    /// use market_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let ports = HttpStatePorts {
    ///     checkout: Arc::new(FixtureCheckoutCommand),
    ///     orders: Arc::new(FixtureOrdersQuery),
    ///     coupons: Arc::new(FixtureCouponsQuery),
    /// };
    /// let state = HttpState::new(ports);
    /// let _checkout = state.checkout.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            checkout,
            orders,
            coupons,
        } = ports;
        Self {
            checkout,
            orders,
            coupons,
        }
    }
}
