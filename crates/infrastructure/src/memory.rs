//! In-memory adapters with the same observable semantics as the PostgreSQL
//! ones: keyset pagination newest-first, filter evaluation per
//! [`domain::FilterExpr::matches`], and an upsert-increment totals record.
//!
//! Used by the service and router test suites; also handy for driving the
//! API without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    DomainError, FilterExpr, PageKey, Ticket, TicketFields, TicketPage, TicketRepository, User,
    UserRepository, WeightTotals,
};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::DuplicateUser(user.email.clone()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTicketRepository {
    tickets: Mutex<Vec<Ticket>>,
    totals: Mutex<Option<WeightTotals>>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tickets ordered by `(data_hora, ticket_id)` descending, the order
    /// of the by-date access path.
    fn sorted_desc(&self) -> Vec<Ticket> {
        let mut all = self.tickets.lock().unwrap().clone();
        all.sort_by(|a, b| {
            (b.data_hora, b.ticket_id.as_str()).cmp(&(a.data_hora, a.ticket_id.as_str()))
        });
        all
    }

    fn page_of(
        ordered: impl IntoIterator<Item = Ticket>,
        exclusive_start: Option<PageKey>,
        limit: u32,
    ) -> TicketPage {
        let mut items: Vec<Ticket> = ordered
            .into_iter()
            .filter(|t| match &exclusive_start {
                Some(key) => {
                    (t.data_hora, t.ticket_id.as_str())
                        < (key.data_hora, key.ticket_id.as_str())
                }
                None => true,
            })
            .take(limit as usize + 1)
            .collect();

        let has_more = items.len() > limit as usize;
        items.truncate(limit as usize);
        let last_evaluated_key = if has_more {
            items.last().map(PageKey::of)
        } else {
            None
        };

        TicketPage {
            items,
            last_evaluated_key,
        }
    }
}

#[async_trait]
impl TicketRepository for MemoryTicketRepository {
    async fn put(&self, ticket: &Ticket) -> Result<(), DomainError> {
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(())
    }

    async fn page_by_date(
        &self,
        limit: u32,
        exclusive_start: Option<PageKey>,
    ) -> Result<TicketPage, DomainError> {
        Ok(Self::page_of(self.sorted_desc(), exclusive_start, limit))
    }

    async fn count_all(&self) -> Result<u64, DomainError> {
        Ok(self.tickets.lock().unwrap().len() as u64)
    }

    async fn scan(
        &self,
        filter: &FilterExpr,
        exclusive_start: Option<PageKey>,
        page_size: u32,
    ) -> Result<TicketPage, DomainError> {
        let matching = self
            .sorted_desc()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect::<Vec<_>>();
        Ok(Self::page_of(matching, exclusive_start, page_size))
    }

    async fn find_data_hora(
        &self,
        ticket_id: &str,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        let tickets = self.tickets.lock().unwrap();
        Ok(tickets
            .iter()
            .find(|t| t.ticket_id == ticket_id)
            .map(|t| t.data_hora))
    }

    async fn update_fields(
        &self,
        ticket_id: &str,
        data_hora: DateTime<Utc>,
        fields: &TicketFields,
    ) -> Result<TicketFields, DomainError> {
        let mut tickets = self.tickets.lock().unwrap();
        match tickets
            .iter_mut()
            .find(|t| t.ticket_id == ticket_id && t.data_hora == data_hora)
        {
            Some(ticket) => {
                ticket.fields = fields.clone();
                Ok(ticket.fields.clone())
            }
            None => Err(DomainError::NotFound(format!("ticket {ticket_id}"))),
        }
    }

    async fn delete(&self, ticket_id: &str, data_hora: DateTime<Utc>) -> Result<(), DomainError> {
        self.tickets
            .lock()
            .unwrap()
            .retain(|t| !(t.ticket_id == ticket_id && t.data_hora == data_hora));
        Ok(())
    }

    async fn add_to_totals(&self, peso_bruto: f64, peso_liquido: f64) -> Result<(), DomainError> {
        let mut totals = self.totals.lock().unwrap();
        let current = totals.get_or_insert_with(WeightTotals::default);
        current.total_peso_bruto += peso_bruto;
        current.total_peso_liquido += peso_liquido;
        Ok(())
    }

    async fn fetch_totals(&self) -> Result<Option<WeightTotals>, DomainError> {
        Ok(*self.totals.lock().unwrap())
    }
}
