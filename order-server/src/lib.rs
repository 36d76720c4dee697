//! Order Server - order lifecycle and financial consistency engine
//!
//! # Overview
//!
//! - **Numbering** (`sequence`): year-scoped, gap-free document numbers
//! - **Finance** (`finance`): derived totals recomputed after every mutation
//! - **Lifecycle** (`lifecycle`): explicit transition tables with guards
//! - **Approvals** (`approval`): request → review → grant workflows
//! - **Expiry** (`scheduler`): periodic expiry of time-boxed grants
//! - **HTTP API** (`api`): axum routes over the services
//!
//! # Module layout
//!
//! ```text
//! order-server/src/
//! ├── core/        # config, state, server, background tasks
//! ├── db/          # redb document store
//! ├── sequence/    # SequenceGenerator
//! ├── finance/     # FinancialRecalculator, money validation
//! ├── lifecycle/   # transition tables, OrderStateMachine
//! ├── orders/      # AggregateService (orders, expense-orders, quotes)
//! ├── approval/    # ApprovalWorkflow and its resources
//! ├── scheduler/   # ExpiryScheduler
//! ├── audit/       # audit log channel, worker, storage
//! ├── services/    # clock, privileges, notifications, post-commit hooks, http
//! ├── auth/        # request context extraction
//! ├── api/         # HTTP routes and handlers
//! └── utils/       # AppError, logging
//! ```

pub mod api;
pub mod approval;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod finance;
pub mod lifecycle;
pub mod orders;
pub mod scheduler;
pub mod sequence;
pub mod services;
pub mod utils;

pub use auth::RequestContext;
pub use crate::core::{Config, Server, ServerState};
pub use db::Store;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and install the logger
///
/// Returns the configuration read after `.env` was applied.
pub fn setup_environment() -> Config {
    // Missing .env is fine
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
   ____          __             _____
  / __ \_________/ /__  _____   / ___/___  ______   _____  _____
 / / / / ___/ __  / _ \/ ___/   \__ \/ _ \/ ___/ | / / _ \/ ___/
/ /_/ / /  / /_/ /  __/ /      ___/ /  __/ /   | |/ /  __/ /
\____/_/   \__,_/\___/_/      /____/\___/_/    |___/\___/_/
    "#
    );
}
