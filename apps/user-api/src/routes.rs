use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use domain_users::{InMemoryUserRepository, UserService, handlers};
use routekit::{Router, middleware};

use crate::config::Config;
use crate::health;

/// Upper bound a single request may spend in handlers and the service;
/// surfaced to the domain as the call deadline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Assemble the application router. Middleware order matters: the first
/// applied is outermost (request id wraps everything, CORS sits closest
/// to the handlers).
pub fn build(config: &Config, service: Arc<UserService<InMemoryUserRepository>>) -> Router {
    let mut router = Router::new();
    router.request_timeout(REQUEST_TIMEOUT);

    router.apply(middleware::request_id(Arc::new(AtomicU64::new(0))));
    router.apply(middleware::recover());
    router.apply(middleware::logger());
    router.apply(middleware::cors(config.cors.origins.clone()));

    router.get("/health", health::health);
    router.get("/health/live", health::live);
    router.get("/health/ready", health::ready);

    handlers::register(&mut router, "/api/v1/users", service);

    router
}
