//! Order repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::order::{self, ActiveModel, Entity as OrderEntity};
use crate::domain::{NewOrder, Order, OrderStatus};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// Insert a Pending order and assign its request id.
    async fn create(&self, order: NewOrder) -> AppResult<Order>;

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// All orders, newest first.
    async fn list(&self) -> AppResult<Vec<Order>>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let result = OrderEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Order::from))
    }

    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            request_id: Set(Order::generate_request_id(now)),
            sender_name: Set(order.sender_name),
            sender_email: Set(order.sender_email),
            sender_phone: Set(order.sender_phone),
            sender_city: Set(order.sender_city),
            recipient_name: Set(order.recipient_name),
            recipient_email: Set(order.recipient_email),
            recipient_phone: Set(order.recipient_phone),
            recipient_city: Set(order.recipient_city),
            weight: Set(order.weight),
            note: Set(order.note),
            pickup_city: Set(order.pickup_city),
            delivery_city: Set(order.delivery_city),
            origin_branch: Set(order.origin_branch),
            destination_branch: Set(order.destination_branch),
            status: Set(OrderStatus::Pending.to_string()),
            request_date: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Order::from(model))
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let order = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Order")?;

        let mut active: ActiveModel = order.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Order::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = OrderEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Order::from).collect())
    }
}
