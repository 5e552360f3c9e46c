use chrono::{DateTime, NaiveDate, Utc};
use domain::{DomainError, FilterExpr, FilterValue, TicketField};

/// Caller-supplied search criteria, all optional on the wire.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub client_name: Option<String>,
    pub ticket_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Build the conjunctive filter for a ticket search.
///
/// At least one of client name / ticket id is required. Date bounds are
/// calendar dates: the start maps to midnight, the end to the last instant
/// of its day, and the interval arm only exists when the two days differ.
pub(crate) fn build_filter(params: &SearchParams) -> Result<FilterExpr, DomainError> {
    let client_name = params.client_name.as_deref().filter(|s| !s.is_empty());
    let ticket_id = params.ticket_id.as_deref().filter(|s| !s.is_empty());

    if client_name.is_none() && ticket_id.is_none() {
        return Err(DomainError::Validation(
            "at least one of clientName or ticketID is required".to_string(),
        ));
    }

    let start_day = params
        .start_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_day)
        .transpose()?;
    let end_day = params
        .end_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_day)
        .transpose()?;

    let start = start_day.map(start_of_day);
    let end = end_day.map(end_of_day);

    let mut parts = Vec::new();
    if let Some(name) = client_name {
        parts.push(FilterExpr::contains(TicketField::Cliente, name));
    }
    if let Some(id) = ticket_id {
        parts.push(FilterExpr::eq(
            TicketField::TicketId,
            FilterValue::Text(id.to_string()),
        ));
    }

    if start.is_some() || end.is_some() {
        let mut arms = Vec::new();
        if let Some(start) = start {
            arms.push(FilterExpr::eq(
                TicketField::DataHora,
                FilterValue::Timestamp(start),
            ));
        }
        if let Some(end) = end {
            arms.push(FilterExpr::eq(
                TicketField::DataHora,
                FilterValue::Timestamp(end),
            ));
        }
        if let (Some(start), Some(end), Some(sd), Some(ed)) = (start, end, start_day, end_day) {
            if sd != ed {
                arms.push(FilterExpr::between(
                    TicketField::DataHora,
                    FilterValue::Timestamp(start),
                    FilterValue::Timestamp(end),
                ));
            }
        }
        parts.push(FilterExpr::or(arms));
    }

    Ok(FilterExpr::and(parts))
}

fn parse_day(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidDateFormat(raw.to_string()))
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    // 23:59:59.999 is always a valid wall-clock time.
    day.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        client_name: Option<&str>,
        ticket_id: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> SearchParams {
        SearchParams {
            client_name: client_name.map(str::to_string),
            ticket_id: ticket_id.map(str::to_string),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        }
    }

    #[test]
    fn requires_client_name_or_ticket_id() {
        let err = build_filter(&params(None, None, Some("2024-01-01"), None)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // Empty strings count as absent.
        let err = build_filter(&params(Some(""), Some(""), None, None)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_unparseable_dates() {
        let err = build_filter(&params(Some("Acme"), None, Some("01/02/2024"), None)).unwrap_err();
        assert_eq!(err, DomainError::InvalidDateFormat("01/02/2024".to_string()));

        let err = build_filter(&params(Some("Acme"), None, None, Some("2024-13-40"))).unwrap_err();
        assert_eq!(err, DomainError::InvalidDateFormat("2024-13-40".to_string()));
    }

    #[test]
    fn equal_dates_produce_exact_match_arms_only() {
        let filter = build_filter(&params(
            Some("Acme"),
            None,
            Some("2024-01-01"),
            Some("2024-01-01"),
        ))
        .unwrap();

        let FilterExpr::And(parts) = &filter else {
            panic!("expected conjunction, got {filter:?}");
        };
        let FilterExpr::Or(arms) = &parts[1] else {
            panic!("expected date disjunction, got {:?}", parts[1]);
        };
        assert_eq!(arms.len(), 2, "no interval arm when the days coincide");
        assert!(arms.iter().all(|arm| matches!(arm, FilterExpr::Eq { .. })));
    }

    #[test]
    fn distinct_dates_add_a_closed_interval_arm() {
        let filter = build_filter(&params(
            None,
            Some("t-1"),
            Some("2024-01-01"),
            Some("2024-01-31"),
        ))
        .unwrap();

        let FilterExpr::And(parts) = &filter else {
            panic!("expected conjunction, got {filter:?}");
        };
        let FilterExpr::Or(arms) = &parts[1] else {
            panic!("expected date disjunction, got {:?}", parts[1]);
        };
        assert_eq!(arms.len(), 3);
        assert!(
            arms.iter()
                .any(|arm| matches!(arm, FilterExpr::Between { .. }))
        );
    }

    #[test]
    fn end_date_normalizes_to_last_instant_of_day() {
        let filter = build_filter(&params(Some("Acme"), None, None, Some("2024-01-31"))).unwrap();

        let FilterExpr::And(parts) = &filter else {
            panic!("expected conjunction, got {filter:?}");
        };
        let FilterExpr::Or(arms) = &parts[1] else {
            panic!("expected date disjunction, got {:?}", parts[1]);
        };
        let FilterExpr::Eq {
            value: FilterValue::Timestamp(end),
            ..
        } = &arms[0]
        else {
            panic!("expected timestamp equality, got {:?}", arms[0]);
        };
        assert_eq!(end.to_rfc3339(), "2024-01-31T23:59:59.999+00:00");
    }
}
