use std::sync::Arc;

use core_config::logging::{init_tracing, install_color_eyre};
use domain_users::{InMemoryUserRepository, UserService};
use tracing::info;

mod config;
mod events;
mod health;
mod routes;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment, config.log_level);

    let repository = InMemoryUserRepository::new();

    let (events_tx, events_rx) = tokio::sync::mpsc::channel(events::CHANNEL_CAPACITY);
    events::spawn_logger(events_rx);

    let service = Arc::new(UserService::new(repository).with_events(events_tx));
    let router = routes::build(&config, service);

    let address = config.server.address();
    info!(environment = ?config.environment, "user-api starting");

    routekit::serve(router, &address, routekit::shutdown_signal()).await?;

    info!("user-api stopped");
    Ok(())
}
