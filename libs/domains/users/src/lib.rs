//! Users Domain
//!
//! This module provides a complete domain implementation for user management
//! backed by an in-memory store.
//!
//! # Features
//!
//! - User CRUD operations
//! - Input validation with distinct error kinds
//! - Email uniqueness enforcement
//! - Lifecycle events (created/updated/deleted)
//! - Explicit per-call deadline/cancellation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (routekit)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, uniqueness, events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let repository = InMemoryUserRepository::new();
//! let service = Arc::new(UserService::new(repository));
//!
//! let mut router = routekit::Router::new();
//! handlers::register(&mut router, "/api/v1/users", service);
//! ```

pub mod context;
pub mod error;
pub mod events;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use context::CallContext;
pub use error::{UserError, UserResult};
pub use events::{EventSender, UserEvent};
pub use ids::IdGenerator;
pub use models::{CreateUser, UpdateUser, User};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
