//! Application layer - Use cases and business workflows

pub mod auth;
pub mod ticket;

pub use auth::{AuthService, LoginOutcome};
pub use ticket::{SearchParams, TicketListing, TicketService};
