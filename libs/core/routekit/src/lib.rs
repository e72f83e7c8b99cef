//! # Routekit
//!
//! A minimal HTTP runtime: route table, middleware chain, request context
//! and a commit-once response, served over hyper.
//!
//! ## Modules
//!
//! - **[`router`]**: ordered route table with `:param` segments, dispatch
//! - **[`middleware`]**: middleware composition plus the built-in set
//!   (request id, panic recovery, request logging, CORS)
//! - **[`context`]**: per-request context handed to handlers
//! - **[`response`]**: buffered response with single-commit semantics
//! - **[`error`]**: structured HTTP errors and the error envelope
//! - **[`server`]**: hyper accept loop with graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use http::StatusCode;
//! use routekit::{middleware, Router};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let mut app = Router::new();
//!     app.apply(middleware::recover());
//!     app.get("/hello/:name", |ctx: routekit::Context| async move {
//!         let name = ctx.param("name").unwrap_or("world").to_string();
//!         ctx.json(StatusCode::OK, &serde_json::json!({ "hello": name }))
//!     });
//!
//!     routekit::serve(app, "0.0.0.0:8080", routekit::shutdown_signal()).await
//! }
//! ```

pub mod context;
pub mod error;
pub mod middleware;
pub mod response;
pub mod router;
pub mod server;

pub use context::Context;
pub use error::HttpError;
pub use middleware::{Middleware, cors, from_fn, logger, recover, request_id};
pub use response::ResponseState;
pub use router::{BoxFuture, Group, Handler, Next, Router};
pub use server::{serve, shutdown_signal};
