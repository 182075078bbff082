//! Order read-side domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    GetOrderRequest, ListOrdersRequest, OrderPayload, OrderRepository, OrderRepositoryError,
    OrderSummaryPayload, OrdersQuery,
};
use crate::domain::Error;

fn map_repository_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        // The read path can only fail with infrastructure errors; settlement
        // variants leaking through indicate an adapter bug.
        other => Error::internal(format!("order repository error: {other}")),
    }
}

/// Order query service implementing the read driving port.
#[derive(Clone)]
pub struct OrdersQueryService<R> {
    order_repo: Arc<R>,
}

impl<R> OrdersQueryService<R> {
    /// Create a new query service over the order repository.
    pub fn new(order_repo: Arc<R>) -> Self {
        Self { order_repo }
    }
}

#[async_trait]
impl<R> OrdersQuery for OrdersQueryService<R>
where
    R: OrderRepository,
{
    async fn get_order(&self, request: GetOrderRequest) -> Result<OrderPayload, Error> {
        let order = self
            .order_repo
            .find_for_customer(&request.customer_id, request.order_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("order {} not found", request.order_id)))?;

        Ok(OrderPayload::from(order))
    }

    async fn list_orders(
        &self,
        request: ListOrdersRequest,
    ) -> Result<Vec<OrderSummaryPayload>, Error> {
        let summaries = self
            .order_repo
            .list_for_customer(&request.customer_id)
            .await
            .map_err(map_repository_error)?;

        Ok(summaries.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockOrderRepository;
    use crate::domain::{
        AddressSnapshot, ErrorCode, Order, OrderDraft, OrderItem, OrderItemDraft, OrderStatus,
        OrderSummary, PaymentMode, UserId,
    };

    fn sample_order(customer_id: UserId, order_id: Uuid) -> Order {
        Order::new(OrderDraft {
            id: order_id,
            customer_id,
            total: BigDecimal::from(250),
            status: OrderStatus::Paid,
            payment_mode: PaymentMode::Card,
            shipping_address: AddressSnapshot {
                recipient: "Amina Okafor".to_owned(),
                line1: "12 Weaver Lane".to_owned(),
                line2: None,
                city: "Jaipur".to_owned(),
                postal_code: "302001".to_owned(),
                country: "IN".to_owned(),
            },
            items: vec![OrderItem::new(OrderItemDraft {
                id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                quantity: 2,
                unit_price: BigDecimal::from(125),
            })
            .expect("valid item")],
            tracking_carrier: None,
            tracking_number: None,
            created_at: Utc::now(),
        })
        .expect("valid order")
    }

    #[rstest]
    #[tokio::test]
    async fn get_order_converts_the_domain_entity() {
        let customer = UserId::random();
        let order_id = Uuid::new_v4();
        let order = sample_order(customer.clone(), order_id);

        let mut repo = MockOrderRepository::new();
        repo.expect_find_for_customer()
            .times(1)
            .returning(move |_, _| Ok(Some(order.clone())));

        let payload = OrdersQueryService::new(Arc::new(repo))
            .get_order(GetOrderRequest {
                customer_id: customer.clone(),
                order_id,
            })
            .await
            .expect("order found");

        assert_eq!(payload.id, order_id);
        assert_eq!(payload.customer_id, customer);
        assert_eq!(payload.items.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_order_maps_to_not_found() {
        let mut repo = MockOrderRepository::new();
        repo.expect_find_for_customer().returning(|_, _| Ok(None));

        let err = OrdersQueryService::new(Arc::new(repo))
            .get_order(GetOrderRequest {
                customer_id: UserId::random(),
                order_id: Uuid::new_v4(),
            })
            .await
            .expect_err("missing order");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_orders_converts_summaries() {
        let mut repo = MockOrderRepository::new();
        repo.expect_list_for_customer().returning(|_| {
            Ok(vec![OrderSummary {
                id: Uuid::new_v4(),
                total: BigDecimal::from(99),
                status: OrderStatus::Paid,
                payment_mode: PaymentMode::Simulated,
                created_at: Utc::now(),
            }])
        });

        let listed = OrdersQueryService::new(Arc::new(repo))
            .list_orders(ListOrdersRequest {
                customer_id: UserId::random(),
            })
            .await
            .expect("list succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].total, BigDecimal::from(99));
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failure_maps_to_service_unavailable() {
        let mut repo = MockOrderRepository::new();
        repo.expect_list_for_customer()
            .returning(|_| Err(OrderRepositoryError::connection("refused")));

        let err = OrdersQueryService::new(Arc::new(repo))
            .list_orders(ListOrdersRequest {
                customer_id: UserId::random(),
            })
            .await
            .expect_err("connection failure surfaces");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
