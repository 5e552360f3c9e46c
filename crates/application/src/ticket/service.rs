use crate::ticket::SearchParams;
use crate::ticket::search::build_filter;
use chrono::Utc;
use domain::{
    ALL_TICKETS_MARKER, DomainError, PageKey, Ticket, TicketFields, TicketRepository, WeightTotals,
};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default page size for ticket listings.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Store round-trip size used by the internal search sweep.
const SCAN_PAGE_SIZE: u32 = 100;

/// A listing page plus the running aggregates shown alongside it.
#[derive(Debug, Clone)]
pub struct TicketListing {
    pub items: Vec<Ticket>,
    pub last_evaluated_key: Option<PageKey>,
    pub total_count: u64,
    pub totals: WeightTotals,
}

/// Use cases around ticket records and the running weight totals.
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    /// Create a ticket and fold its weights into the running totals.
    ///
    /// The two writes are independent store calls with no rollback: when the
    /// totals update fails after the put succeeded, the error surfaces to
    /// the caller and the ticket stays un-aggregated.
    pub async fn create(&self, fields: TicketFields) -> Result<Ticket, DomainError> {
        let ticket = Ticket {
            ticket_id: Uuid::new_v4().to_string(),
            data_hora: Utc::now(),
            mtr: rand::thread_rng().gen_range(0..100_000),
            fields,
            all_tickets: ALL_TICKETS_MARKER.to_string(),
        };

        self.tickets.put(&ticket).await?;

        let peso_bruto = ticket.fields.peso_bruto.unwrap_or(0.0);
        let peso_liquido = ticket.fields.peso_liquido.unwrap_or(0.0);
        if let Err(e) = self.tickets.add_to_totals(peso_bruto, peso_liquido).await {
            warn!(ticket_id = %ticket.ticket_id, "ticket stored but totals update failed");
            return Err(e);
        }

        debug!(ticket_id = %ticket.ticket_id, mtr = ticket.mtr, "ticket created");
        Ok(ticket)
    }

    /// One page of tickets, newest first, plus count and weight totals.
    pub async fn list(
        &self,
        limit: Option<u32>,
        exclusive_start: Option<PageKey>,
    ) -> Result<TicketListing, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);

        let page = self.tickets.page_by_date(limit, exclusive_start).await?;
        let total_count = self.tickets.count_all().await?;
        let totals = self.tickets.fetch_totals().await?.unwrap_or_default();

        Ok(TicketListing {
            items: page.items,
            last_evaluated_key: page.last_evaluated_key,
            total_count,
            totals,
        })
    }

    /// Filtered search over the whole table.
    ///
    /// Follows the store's pagination internally until the continuation key
    /// is exhausted and returns every match in one unbounded list.
    pub async fn search(&self, params: SearchParams) -> Result<Vec<Ticket>, DomainError> {
        let filter = build_filter(&params)?;

        let mut items = Vec::new();
        let mut start: Option<PageKey> = None;
        loop {
            let page = self.tickets.scan(&filter, start, SCAN_PAGE_SIZE).await?;
            items.extend(page.items);
            match page.last_evaluated_key {
                Some(key) => start = Some(key),
                None => break,
            }
        }

        debug!(matches = items.len(), "ticket search finished");
        Ok(items)
    }

    /// Overwrite the writable attributes of an existing ticket.
    ///
    /// The running totals are not adjusted, even when weights change.
    pub async fn update(
        &self,
        ticket_id: &str,
        fields: TicketFields,
    ) -> Result<TicketFields, DomainError> {
        let data_hora = self
            .tickets
            .find_data_hora(ticket_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("ticket {ticket_id}")))?;

        self.tickets
            .update_fields(ticket_id, data_hora, &fields)
            .await
    }

    /// Delete a ticket. The running totals are not decremented.
    pub async fn delete(&self, ticket_id: &str) -> Result<(), DomainError> {
        let data_hora = self
            .tickets
            .find_data_hora(ticket_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("ticket {ticket_id}")))?;

        self.tickets.delete(ticket_id, data_hora).await
    }
}
