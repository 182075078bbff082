//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. Settlement arithmetic lives in
//!   `domain::money`; adapters decide nothing about prices.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use market_backend::outbound::persistence::{DbPool, PoolConfig, DieselOrderRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/market");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselOrderRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_coupon_repository;
mod diesel_order_repository;
mod models;
mod pool;
mod schema;

pub use diesel_coupon_repository::DieselCouponRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
