//! Order intake service: public booking requests and admin review.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::{Branch, NewOrder, Order, OrderDetails, OrderStatus};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{BranchRepository, UnitOfWork};

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Record a booking as Pending with a fresh request id.
    ///
    /// Origin and destination branches are not compared here; the booking
    /// form is the only place that rejects identical branches.
    async fn create_order(&self, order: NewOrder) -> AppResult<Order>;

    /// Newest first, branches populated.
    async fn list_orders(&self) -> AppResult<Vec<OrderDetails>>;

    async fn get_order(&self, id: Uuid) -> AppResult<OrderDetails>;

    /// Overwrite the status without any other side effect.
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<OrderDetails>;

    /// Rejecting deletes the order outright. Unknown ids are not an error.
    async fn reject_order(&self, id: Uuid) -> AppResult<()>;
}

/// Resolve an order's two branch references.
pub(crate) async fn populate(
    branches: &dyn BranchRepository,
    order: Order,
) -> AppResult<OrderDetails> {
    let found = branches
        .find_many(vec![order.origin_branch, order.destination_branch])
        .await?;
    let by_id = index(found);
    Ok(OrderDetails::populate(order, |id| by_id.get(id).cloned()))
}

fn index(branches: Vec<Branch>) -> HashMap<Uuid, Branch> {
    branches.into_iter().map(|b| (b.id, b)).collect()
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn create_order(&self, order: NewOrder) -> AppResult<Order> {
        let order = self.uow.orders().create(order).await?;
        tracing::info!(order_id = %order.id, request_id = %order.request_id, "Order received");
        Ok(order)
    }

    async fn list_orders(&self) -> AppResult<Vec<OrderDetails>> {
        let orders = self.uow.orders();
        let branches = self.uow.branches();
        let (orders, branches) = parallel::join2(orders.list(), branches.list()).await?;

        let by_id = index(branches);
        Ok(orders
            .into_iter()
            .map(|order| OrderDetails::populate(order, |id| by_id.get(id).cloned()))
            .collect())
    }

    async fn get_order(&self, id: Uuid) -> AppResult<OrderDetails> {
        let order = self
            .uow
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Order")?;
        populate(self.uow.branches().as_ref(), order).await
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<OrderDetails> {
        let order = self.uow.orders().update_status(id, status).await?;
        tracing::info!(order_id = %id, status = %status, "Order status updated");
        populate(self.uow.branches().as_ref(), order).await
    }

    async fn reject_order(&self, id: Uuid) -> AppResult<()> {
        let removed = self.uow.orders().delete(id).await?;
        tracing::info!(order_id = %id, removed, "Order rejected");
        Ok(())
    }
}
