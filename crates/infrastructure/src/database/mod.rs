mod expression;
mod ticket_repository;
mod user_repository;

pub use ticket_repository::PgTicketRepository;
pub use user_repository::PgUserRepository;
