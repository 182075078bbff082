//! Builders for HTTP state ports with fixture fallbacks.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    CheckoutCommand, CouponsQuery, FixtureCheckoutCommand, FixtureCouponsQuery, FixtureOrdersQuery,
    OrdersQuery,
};
use crate::domain::{CheckoutService, CouponsQueryService, OrdersQueryService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{DieselCouponRepository, DieselOrderRepository};

use super::ServerConfig;

/// Build the checkout and order query ports.
///
/// Both services share a single order repository so a settled order is
/// immediately visible to the query side.
fn build_order_ports(config: &ServerConfig) -> (Arc<dyn CheckoutCommand>, Arc<dyn OrdersQuery>) {
    match &config.db_pool {
        Some(pool) => {
            let repo = Arc::new(DieselOrderRepository::new(pool.clone()));
            (
                Arc::new(CheckoutService::new(repo.clone())),
                Arc::new(OrdersQueryService::new(repo)),
            )
        }
        None => (
            Arc::new(FixtureCheckoutCommand),
            Arc::new(FixtureOrdersQuery),
        ),
    }
}

fn build_coupons_port(config: &ServerConfig) -> Arc<dyn CouponsQuery> {
    match &config.db_pool {
        Some(pool) => Arc::new(CouponsQueryService::new(Arc::new(
            DieselCouponRepository::new(pool.clone()),
        ))),
        None => Arc::new(FixtureCouponsQuery),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (checkout, orders) = build_order_ports(config);
    let coupons = build_coupons_port(config);

    web::Data::new(HttpState::new(HttpStatePorts {
        checkout,
        orders,
        coupons,
    }))
}
