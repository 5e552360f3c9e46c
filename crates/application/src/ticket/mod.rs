mod search;
mod service;

pub use search::SearchParams;
pub use service::{TicketListing, TicketService};
