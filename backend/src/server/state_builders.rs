//! Builders wiring a user store into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use users_api::domain::UsersService;
use users_api::inbound::http::state::HttpState;
use users_api::outbound::memory::InMemoryUserRepository;
use users_api::outbound::persistence::DieselUserRepository;

use super::ServerConfig;

/// Build the handler state, backed by PostgreSQL when a pool is configured
/// and by the in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(UsersService::new(Arc::new(DieselUserRepository::new(
                pool.clone(),
            ))));
            HttpState::new(service.clone(), service)
        }
        None => {
            let service = Arc::new(UsersService::new(Arc::new(InMemoryUserRepository::new())));
            HttpState::new(service.clone(), service)
        }
    };
    web::Data::new(state)
}
