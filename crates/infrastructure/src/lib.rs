//! Infrastructure layer - store adapters and configuration
//!
//! PostgreSQL implementations of the domain repository traits, the filter
//! compiler that turns [`domain::FilterExpr`] trees into SQL, in-memory
//! adapters with the same semantics, and environment configuration.

pub mod config;
pub mod database;
pub mod memory;

pub use config::Config;
pub use database::{PgTicketRepository, PgUserRepository};
pub use memory::{MemoryTicketRepository, MemoryUserRepository};
