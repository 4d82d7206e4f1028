//! In-memory repositories and a recording notifier for driving the full
//! router without PostgreSQL or Redis.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use sendit_api::api::{create_router, AppState};
use sendit_api::config::Config;
use sendit_api::domain::{
    AccountStatus, Branch, BranchChanges, NewBranch, NewOrder, NewParcel, NewUser, Order,
    OrderStatus, Parcel, ParcelChanges, ParcelStatus, User, UserChanges,
};
use sendit_api::errors::{AppError, AppResult};
use sendit_api::infra::{
    BranchRepository, Notifier, OrderRepository, ParcelRepository, UnitOfWork, UserRepository,
};
use sendit_api::jobs::EmailJob;
use sendit_api::services::Services;

pub const TEST_SECRET: &str = "integration-secret-that-is-long-enough-for-hs256";

#[derive(Default)]
pub struct MemoryBranches(Mutex<Vec<Branch>>);

#[async_trait]
impl BranchRepository for MemoryBranches {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Branch>> {
        Ok(self.0.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Branch>> {
        Ok(self.0.lock().unwrap().iter().find(|b| b.name == name).cloned())
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Branch>> {
        let rows = self.0.lock().unwrap();
        Ok(rows.iter().filter(|b| ids.contains(&b.id)).cloned().collect())
    }

    async fn create(&self, branch: NewBranch) -> AppResult<Branch> {
        let now = Utc::now();
        let created = Branch {
            id: Uuid::new_v4(),
            name: branch.name,
            city: branch.city,
            state: branch.state,
            address: branch.address,
            phone: branch.phone,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: BranchChanges) -> AppResult<Branch> {
        let mut rows = self.0.lock().unwrap();
        let branch = rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found("Branch"))?;
        if let Some(v) = changes.name {
            branch.name = v;
        }
        if let Some(v) = changes.city {
            branch.city = v;
        }
        if let Some(v) = changes.state {
            branch.state = v;
        }
        if let Some(v) = changes.address {
            branch.address = v;
        }
        if let Some(v) = changes.phone {
            branch.phone = v;
        }
        branch.updated_at = Utc::now();
        Ok(branch.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.0.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        Ok(rows.len() != before)
    }

    async fn list(&self) -> AppResult<Vec<Branch>> {
        Ok(self.0.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryUsers(Mutex<Vec<User>>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let rows = self.0.lock().unwrap();
        Ok(rows
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            fullname: user.fullname,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            country: user.country,
            address: user.address,
            role: user.role,
            status: user.status,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let mut rows = self.0.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        if let Some(v) = changes.fullname {
            user.fullname = v;
        }
        if changes.age.is_some() {
            user.age = changes.age;
        }
        if changes.country.is_some() {
            user.country = changes.country;
        }
        if changes.address.is_some() {
            user.address = changes.address;
        }
        if let Some(v) = changes.role {
            user.role = v;
        }
        if let Some(v) = changes.status {
            user.status = v;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.0.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() != before)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn list_by_status(&self, status: AccountStatus) -> AppResult<Vec<User>> {
        let rows = self.0.lock().unwrap();
        Ok(rows.iter().filter(|u| u.status == status).cloned().collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.0.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryOrders(Mutex<Vec<Order>>);

#[async_trait]
impl OrderRepository for MemoryOrders {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.0.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let now = Utc::now();
        let created = Order {
            id: Uuid::new_v4(),
            request_id: Order::generate_request_id(now),
            sender_name: order.sender_name,
            sender_email: order.sender_email,
            sender_phone: order.sender_phone,
            sender_city: order.sender_city,
            recipient_name: order.recipient_name,
            recipient_email: order.recipient_email,
            recipient_phone: order.recipient_phone,
            recipient_city: order.recipient_city,
            weight: order.weight,
            note: order.note,
            pickup_city: order.pickup_city,
            delivery_city: order.delivery_city,
            origin_branch: order.origin_branch,
            destination_branch: order.destination_branch,
            status: OrderStatus::Pending,
            request_date: now,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let mut rows = self.0.lock().unwrap();
        let order = rows
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::not_found("Order"))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.0.lock().unwrap();
        let before = rows.len();
        rows.retain(|o| o.id != id);
        Ok(rows.len() != before)
    }

    async fn list(&self) -> AppResult<Vec<Order>> {
        Ok(self.0.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryParcels(Mutex<Vec<Parcel>>);

#[async_trait]
impl ParcelRepository for MemoryParcels {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Parcel>> {
        Ok(self.0.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, parcel: NewParcel) -> AppResult<Parcel> {
        let now = Utc::now();
        let created = Parcel {
            id: Uuid::new_v4(),
            from: parcel.from,
            to: parcel.to,
            sendername: parcel.sendername,
            recipientname: parcel.recipientname,
            senderemail: parcel.senderemail,
            recipientemail: parcel.recipientemail,
            weight: parcel.weight,
            cost: parcel.cost,
            note: parcel.note,
            date: parcel.date,
            status: parcel.status,
            origin_branch: parcel.origin_branch,
            destination_branch: parcel.destination_branch,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: ParcelChanges) -> AppResult<Parcel> {
        let mut rows = self.0.lock().unwrap();
        let parcel = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found("Parcel"))?;
        if let Some(v) = changes.from {
            parcel.from = v;
        }
        if let Some(v) = changes.to {
            parcel.to = v;
        }
        if let Some(v) = changes.sendername {
            parcel.sendername = v;
        }
        if let Some(v) = changes.recipientname {
            parcel.recipientname = v;
        }
        if let Some(v) = changes.senderemail {
            parcel.senderemail = v;
        }
        if let Some(v) = changes.recipientemail {
            parcel.recipientemail = v;
        }
        if let Some(v) = changes.weight {
            parcel.weight = v;
        }
        if let Some(v) = changes.cost {
            parcel.cost = v;
        }
        if changes.note.is_some() {
            parcel.note = changes.note;
        }
        if let Some(v) = changes.date {
            parcel.date = v;
        }
        if let Some(v) = changes.status {
            parcel.status = v;
        }
        if changes.origin_branch.is_some() {
            parcel.origin_branch = changes.origin_branch;
        }
        if changes.destination_branch.is_some() {
            parcel.destination_branch = changes.destination_branch;
        }
        parcel.updated_at = Utc::now();
        Ok(parcel.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.0.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }

    async fn list(&self) -> AppResult<Vec<Parcel>> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn list_by_sender_email(&self, email: &str) -> AppResult<Vec<Parcel>> {
        let rows = self.0.lock().unwrap();
        Ok(rows
            .iter()
            // Same comparison as `lower(senderemail) = lower($1)`.
            .filter(|p| p.senderemail.to_lowercase() == email.trim().to_lowercase())
            .cloned()
            .collect())
    }

    async fn list_by_status(&self, status: ParcelStatus) -> AppResult<Vec<Parcel>> {
        let rows = self.0.lock().unwrap();
        Ok(rows.iter().filter(|p| p.status == status).cloned().collect())
    }

    async fn count_by_status(&self, status: ParcelStatus) -> AppResult<u64> {
        let rows = self.0.lock().unwrap();
        Ok(rows.iter().filter(|p| p.status == status).count() as u64)
    }
}

/// All four stores, shared between the router and the assertions.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub branches: Arc<MemoryBranches>,
    pub users: Arc<MemoryUsers>,
    pub orders: Arc<MemoryOrders>,
    pub parcels: Arc<MemoryParcels>,
}

impl UnitOfWork for MemoryStore {
    fn branches(&self) -> Arc<dyn BranchRepository> {
        self.branches.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn parcels(&self) -> Arc<dyn ParcelRepository> {
        self.parcels.clone()
    }
}

impl MemoryStore {
    pub fn parcel_count(&self) -> usize {
        self.parcels.0.lock().unwrap().len()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let rows = self.users.0.lock().unwrap();
        rows.iter().find(|u| u.email == email).cloned()
    }
}

/// Keeps every queued email so tests can inspect recipients.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<EmailJob>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn enqueue_email(&self, job: EmailJob) -> AppResult<()> {
        self.sent.lock().unwrap().push(job);
        Ok(())
    }
}

impl RecordingNotifier {
    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|j| j.to.clone()).collect()
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::default();
        let notifier = Arc::new(RecordingNotifier::default());
        let services = Services::with_unit_of_work(
            Arc::new(store.clone()),
            Config::for_tests(TEST_SECRET),
            notifier.clone(),
        );
        let router = create_router(AppState::from_services(&services));

        Self {
            router,
            store,
            notifier,
        }
    }

    /// Send a request and return the status with the parsed body
    /// (`Value::Null` for empty or non-JSON bodies).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, None).await
    }

    pub async fn create_branch(&self, name: &str, city: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/branches",
                serde_json::json!({
                    "name": name,
                    "city": city,
                    "state": format!("{} County", city),
                    "address": "Main Street 1",
                    "phone": "+254700000000"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "branch create failed: {}", body);
        body["_id"].as_str().unwrap().to_string()
    }

    /// Id of the branch called `name`, creating it on first use.
    pub async fn ensure_branch(&self, name: &str, city: &str) -> String {
        let existing = self.store.branches.find_by_name(name).await.unwrap();
        match existing {
            Some(branch) => branch.id.to_string(),
            None => self.create_branch(name, city).await,
        }
    }

    /// Book a Nairobi to Mombasa order; returns the response body.
    pub async fn book_order(&self, sender_email: &str) -> Value {
        let origin = self.ensure_branch("Westlands Hub", "Nairobi").await;
        let destination = self.ensure_branch("Nyali Depot", "Mombasa").await;

        let (status, body) = self
            .post(
                "/api/v1/orders",
                order_payload(sender_email, &origin, &destination),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "order create failed: {}", body);
        body
    }

    /// Register then log in; returns the bearer token.
    pub async fn login_as(&self, email: &str, role: &str) -> String {
        let password = "SecurePass123!";
        let (status, body) = self
            .post(
                "/api/v1/auth/register",
                serde_json::json!({
                    "fullname": "Test Person",
                    "email": email,
                    "password": password,
                    "role": role
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }
}

pub fn order_payload(sender_email: &str, origin: &str, destination: &str) -> Value {
    serde_json::json!({
        "senderName": "Alice Otieno",
        "senderEmail": sender_email,
        "senderPhone": "+254711111111",
        "senderCity": "Nairobi",
        "recipientName": "Bob Mwangi",
        "recipientEmail": "bob@example.com",
        "recipientPhone": "+254722222222",
        "recipientCity": "Mombasa",
        "weight": 2.5,
        "note": "Fragile",
        "pickupCity": "Nairobi",
        "deliveryCity": "Mombasa",
        "originBranch": origin,
        "destinationBranch": destination
    })
}
