use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker value shared by every ticket; keying the by-date access path on a
/// constant lets one index serve "all tickets ordered by dataHora".
pub const ALL_TICKETS_MARKER: &str = "ALL";

/// The writable attributes of a ticket, as submitted by clients.
///
/// Every field is optional: absent fields are stored as nulls, and absent
/// weights count as zero toward the running totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketFields {
    pub cliente: Option<String>,
    pub produto: Option<String>,
    pub operador: Option<String>,
    pub placa: Option<String>,
    pub local: Option<String>,
    #[serde(rename = "pesoBruto")]
    pub peso_bruto: Option<f64>,
    #[serde(rename = "pesoLiquido")]
    pub peso_liquido: Option<f64>,
    pub tara: Option<f64>,
}

/// A weighbridge ticket.
///
/// `(ticket_id, data_hora)` is the stable key: once the timestamp is stamped
/// at creation, updates and deletes must address the record by both parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "ticketId")]
    pub ticket_id: String,
    #[serde(rename = "dataHora")]
    pub data_hora: DateTime<Utc>,
    #[serde(rename = "MTR")]
    pub mtr: i32,
    #[serde(flatten)]
    pub fields: TicketFields,
    #[serde(rename = "allTickets")]
    pub all_tickets: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn ticket_serializes_with_wire_field_names() {
        let ticket = Ticket {
            ticket_id: "t-1".to_string(),
            data_hora: Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap(),
            mtr: 42,
            fields: TicketFields {
                cliente: Some("Acme".to_string()),
                peso_bruto: Some(1200.5),
                ..Default::default()
            },
            all_tickets: ALL_TICKETS_MARKER.to_string(),
        };

        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["ticketId"], "t-1");
        assert_eq!(json["MTR"], 42);
        assert_eq!(json["cliente"], "Acme");
        assert_eq!(json["pesoBruto"], 1200.5);
        assert_eq!(json["allTickets"], "ALL");
        assert!(json["dataHora"].as_str().unwrap().starts_with("2024-05-10T08:30:00"));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let fields: TicketFields = serde_json::from_str(r#"{"cliente": "Acme"}"#).unwrap();
        assert_eq!(fields.cliente.as_deref(), Some("Acme"));
        assert_eq!(fields.peso_bruto, None);
        assert_eq!(fields.tara, None);
    }
}
