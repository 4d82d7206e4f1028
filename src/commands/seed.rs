//! `seed admin`: create the administrator account if it does not exist.

use std::sync::Arc;

use crate::cli::args::{SeedArgs, SeedTarget};
use crate::config::{Config, ROLE_ADMIN, SEED_ADMIN_EMAIL, SEED_ADMIN_NAME};
use crate::domain::{CreateUser, Password};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{AuthService, Authenticator};

pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    match args.target {
        SeedTarget::Admin { password } => seed_admin(config, password).await,
    }
}

async fn seed_admin(config: Config, password: Option<String>) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    if uow.users().find_by_email(SEED_ADMIN_EMAIL).await?.is_some() {
        println!("Admin user already exists");
        return Ok(());
    }

    let generated = password.is_none();
    let password = password.unwrap_or_else(Password::generate_plain);

    let admin = Authenticator::new(uow, config)
        .register(CreateUser {
            fullname: SEED_ADMIN_NAME.to_string(),
            email: SEED_ADMIN_EMAIL.to_string(),
            password: password.clone(),
            age: None,
            country: None,
            address: None,
            role: Some(ROLE_ADMIN.to_string()),
        })
        .await?;

    tracing::info!(user_id = %admin.id, "Admin user seeded");
    println!("Admin user created successfully!");
    println!("Email: {}", admin.email);
    if generated {
        println!("Password: {}", password);
    }
    Ok(())
}
