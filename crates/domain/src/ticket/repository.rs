use crate::DomainError;
use crate::ticket::{FilterExpr, PageKey, Ticket, TicketFields, TicketPage, WeightTotals};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for ticket records and the running-totals record.
///
/// This trait defines the contract for ticket storage and retrieval.
/// Implementations should be provided in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persist a new ticket.
    async fn put(&self, ticket: &Ticket) -> Result<(), DomainError>;

    /// One page from the by-date access path, newest first.
    ///
    /// `exclusive_start` resumes after the last item of the previous page;
    /// the returned key, if any, continues the same traversal with no
    /// overlap and no gaps.
    async fn page_by_date(
        &self,
        limit: u32,
        exclusive_start: Option<PageKey>,
    ) -> Result<TicketPage, DomainError>;

    /// Count-only query over the by-date access path.
    async fn count_all(&self) -> Result<u64, DomainError>;

    /// One bounded round-trip of a filtered sweep over the whole table.
    ///
    /// Callers follow `last_evaluated_key` until it comes back `None`.
    async fn scan(
        &self,
        filter: &FilterExpr,
        exclusive_start: Option<PageKey>,
        page_size: u32,
    ) -> Result<TicketPage, DomainError>;

    /// Resolve the sort-key timestamp for a ticket id.
    async fn find_data_hora(
        &self,
        ticket_id: &str,
    ) -> Result<Option<DateTime<Utc>>, DomainError>;

    /// Overwrite the writable attributes of the ticket at
    /// `(ticket_id, data_hora)`, returning the values as stored.
    async fn update_fields(
        &self,
        ticket_id: &str,
        data_hora: DateTime<Utc>,
        fields: &TicketFields,
    ) -> Result<TicketFields, DomainError>;

    /// Delete the ticket at `(ticket_id, data_hora)`.
    async fn delete(&self, ticket_id: &str, data_hora: DateTime<Utc>) -> Result<(), DomainError>;

    /// Atomically add to the running totals, creating the record at zero
    /// first when it does not exist yet.
    async fn add_to_totals(&self, peso_bruto: f64, peso_liquido: f64) -> Result<(), DomainError>;

    /// Point lookup of the running-totals record.
    async fn fetch_totals(&self) -> Result<Option<WeightTotals>, DomainError>;
}
