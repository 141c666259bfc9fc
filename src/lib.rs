use std::sync::Arc;

pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::{MemoryStore, OvertimeStore};
pub use services::{OvertimeService, UserContextService};

pub struct AppState {
    pub service: OvertimeService,
    pub user_context: UserContextService,
}

impl AppState {
    pub fn new(store: Arc<dyn OvertimeStore>) -> Self {
        Self {
            service: OvertimeService::new(store.clone()),
            user_context: UserContextService::new(store),
        }
    }
}
