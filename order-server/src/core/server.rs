//! Server lifecycle
//!
//! ```text
//! initialize state → spawn background tasks → serve HTTP → ctrl-c
//!                                                            ↓
//!                                       stop HTTP → cancel tasks → drain audit
//! ```

use std::net::SocketAddr;

use crate::core::{BackgroundTasks, Config, Result, ServerState};
use crate::services::https;

pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        let (state, audit_rx) = ServerState::initialize(&self.config)?;

        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks, audit_rx);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!(
            environment = %self.config.environment,
            admins = self.config.admin_user_ids.len(),
            "Order server starting on {}",
            addr
        );

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };
        let served = https::start_server(https::build_router(state), addr, shutdown).await;

        tasks.check_health();
        tasks.shutdown().await;
        served
    }
}
