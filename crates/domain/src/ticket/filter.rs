use crate::Ticket;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Ticket attributes a filter may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    TicketId,
    Cliente,
    DataHora,
}

/// A filter operand: text or a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Structured filter expression for ticket scans.
///
/// Services build the tree, store adapters compile it to their query
/// language. [`FilterExpr::matches`] defines the reference semantics every
/// adapter must agree with.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Case-sensitive substring containment on a text field.
    Contains { field: TicketField, needle: String },
    /// Exact equality.
    Eq {
        field: TicketField,
        value: FilterValue,
    },
    /// Closed interval, both bounds included.
    Between {
        field: TicketField,
        lower: FilterValue,
        upper: FilterValue,
    },
    /// Conjunction; empty matches everything.
    And(Vec<FilterExpr>),
    /// Disjunction; empty matches nothing.
    Or(Vec<FilterExpr>),
}

impl FilterExpr {
    pub fn contains(field: TicketField, needle: impl Into<String>) -> Self {
        Self::Contains {
            field,
            needle: needle.into(),
        }
    }

    pub fn eq(field: TicketField, value: FilterValue) -> Self {
        Self::Eq { field, value }
    }

    pub fn between(field: TicketField, lower: FilterValue, upper: FilterValue) -> Self {
        Self::Between {
            field,
            lower,
            upper,
        }
    }

    pub fn and(parts: Vec<FilterExpr>) -> Self {
        Self::And(parts)
    }

    pub fn or(parts: Vec<FilterExpr>) -> Self {
        Self::Or(parts)
    }

    /// Evaluate the expression against a ticket.
    ///
    /// A field the ticket does not carry (e.g. a null cliente) never matches.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            FilterExpr::Contains { field, needle } => match field.resolve(ticket) {
                Some(FilterValue::Text(text)) => text.contains(needle.as_str()),
                _ => false,
            },
            FilterExpr::Eq { field, value } => {
                field.resolve(ticket).as_ref() == Some(value)
            }
            FilterExpr::Between {
                field,
                lower,
                upper,
            } => match field.resolve(ticket) {
                Some(actual) => {
                    compare(&actual, lower).is_some_and(|ord| ord != Ordering::Less)
                        && compare(&actual, upper).is_some_and(|ord| ord != Ordering::Greater)
                }
                None => false,
            },
            FilterExpr::And(parts) => parts.iter().all(|part| part.matches(ticket)),
            FilterExpr::Or(parts) => parts.iter().any(|part| part.matches(ticket)),
        }
    }
}

impl TicketField {
    fn resolve(self, ticket: &Ticket) -> Option<FilterValue> {
        match self {
            TicketField::TicketId => Some(FilterValue::Text(ticket.ticket_id.clone())),
            TicketField::Cliente => ticket.fields.cliente.clone().map(FilterValue::Text),
            TicketField::DataHora => Some(FilterValue::Timestamp(ticket.data_hora)),
        }
    }
}

/// Order two operands of the same kind; mixed kinds are incomparable.
fn compare(a: &FilterValue, b: &FilterValue) -> Option<Ordering> {
    match (a, b) {
        (FilterValue::Text(x), FilterValue::Text(y)) => Some(x.cmp(y)),
        (FilterValue::Timestamp(x), FilterValue::Timestamp(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::{ALL_TICKETS_MARKER, TicketFields};
    use chrono::TimeZone;

    fn ticket(id: &str, cliente: Option<&str>, data_hora: DateTime<Utc>) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            data_hora,
            mtr: 0,
            fields: TicketFields {
                cliente: cliente.map(str::to_string),
                ..Default::default()
            },
            all_tickets: ALL_TICKETS_MARKER.to_string(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn contains_is_case_sensitive_substring() {
        let expr = FilterExpr::contains(TicketField::Cliente, "Acme");
        let when = at(2024, 1, 1, 0);

        assert!(expr.matches(&ticket("a", Some("Acme Ltda"), when)));
        assert!(expr.matches(&ticket("b", Some("Grupo Acme"), when)));
        assert!(!expr.matches(&ticket("c", Some("acme ltda"), when)));
        assert!(!expr.matches(&ticket("d", Some("Outro"), when)));
    }

    #[test]
    fn missing_cliente_never_matches() {
        let expr = FilterExpr::contains(TicketField::Cliente, "Acme");
        assert!(!expr.matches(&ticket("a", None, at(2024, 1, 1, 0))));
    }

    #[test]
    fn eq_on_ticket_id() {
        let expr = FilterExpr::eq(
            TicketField::TicketId,
            FilterValue::Text("t-7".to_string()),
        );
        assert!(expr.matches(&ticket("t-7", None, at(2024, 1, 1, 0))));
        assert!(!expr.matches(&ticket("t-8", None, at(2024, 1, 1, 0))));
    }

    #[test]
    fn between_is_a_closed_interval() {
        let expr = FilterExpr::between(
            TicketField::DataHora,
            FilterValue::Timestamp(at(2024, 1, 1, 0)),
            FilterValue::Timestamp(at(2024, 1, 31, 0)),
        );

        assert!(expr.matches(&ticket("a", None, at(2024, 1, 1, 0))), "lower bound included");
        assert!(expr.matches(&ticket("b", None, at(2024, 1, 31, 0))), "upper bound included");
        assert!(expr.matches(&ticket("c", None, at(2024, 1, 15, 12))));
        assert!(!expr.matches(&ticket("d", None, at(2023, 12, 31, 23))));
        assert!(!expr.matches(&ticket("e", None, at(2024, 2, 1, 0))));
    }

    #[test]
    fn conjunction_and_disjunction() {
        let when = at(2024, 6, 1, 10);
        let both = FilterExpr::and(vec![
            FilterExpr::contains(TicketField::Cliente, "Acme"),
            FilterExpr::eq(TicketField::TicketId, FilterValue::Text("t-1".to_string())),
        ]);
        assert!(both.matches(&ticket("t-1", Some("Acme"), when)));
        assert!(!both.matches(&ticket("t-2", Some("Acme"), when)));

        let either = FilterExpr::or(vec![
            FilterExpr::eq(TicketField::DataHora, FilterValue::Timestamp(when)),
            FilterExpr::eq(TicketField::TicketId, FilterValue::Text("t-9".to_string())),
        ]);
        assert!(either.matches(&ticket("t-1", None, when)));
        assert!(either.matches(&ticket("t-9", None, at(2024, 6, 2, 0))));
        assert!(!either.matches(&ticket("t-1", None, at(2024, 6, 2, 0))));
    }

    #[test]
    fn empty_composites() {
        let any = ticket("a", None, at(2024, 1, 1, 0));
        assert!(FilterExpr::and(vec![]).matches(&any));
        assert!(!FilterExpr::or(vec![]).matches(&any));
    }
}
