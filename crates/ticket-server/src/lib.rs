pub mod api;
pub mod auth;
pub mod state;

use application::{AuthService, TicketService};
use infrastructure::{PgTicketRepository, PgUserRepository};
use sqlx::PgPool;
use state::AppState;
use std::sync::Arc;

/// Wire the PostgreSQL adapters into the services and build the shared
/// state. Called once at startup; the handles live for the process lifetime.
pub fn setup_app_state(pool: PgPool, jwt_secret: String) -> Arc<AppState> {
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let tickets = Arc::new(PgTicketRepository::new(pool));

    Arc::new(AppState::new(
        AuthService::new(users, jwt_secret),
        TicketService::new(tickets),
    ))
}
