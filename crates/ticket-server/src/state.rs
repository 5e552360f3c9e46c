use application::{AuthService, TicketService};

/// Shared application state threaded through the axum handlers.
pub struct AppState {
    pub auth: AuthService,
    pub tickets: TicketService,
}

impl AppState {
    pub fn new(auth: AuthService, tickets: TicketService) -> Self {
        Self { auth, tickets }
    }
}
