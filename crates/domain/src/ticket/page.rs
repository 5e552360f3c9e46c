use crate::{DomainError, Ticket};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exclusive-start cursor for paged ticket queries.
///
/// The wire form is URL-safe base64 (no padding) of the JSON blob
/// `{"dataHora": ..., "ticketId": ...}`. Clients treat it as opaque and pass
/// it back verbatim to resume after the last item they saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageKey {
    #[serde(rename = "dataHora")]
    pub data_hora: DateTime<Utc>,
    #[serde(rename = "ticketId")]
    pub ticket_id: String,
}

impl PageKey {
    pub fn of(ticket: &Ticket) -> Self {
        Self {
            data_hora: ticket.data_hora,
            ticket_id: ticket.ticket_id.clone(),
        }
    }

    /// Encode for transport in a query parameter.
    pub fn encode(&self) -> String {
        // A two-field struct always serializes.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a caller-supplied cursor, rejecting anything that is not the
    /// encoding produced by [`PageKey::encode`].
    pub fn decode(raw: &str) -> Result<Self, DomainError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw)
            .map_err(|_| DomainError::Validation("invalid page key".to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|_| DomainError::Validation("invalid page key".to_string()))
    }
}

/// One page of tickets plus the cursor for the next page, if any.
#[derive(Debug, Clone)]
pub struct TicketPage {
    pub items: Vec<Ticket>,
    pub last_evaluated_key: Option<PageKey>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn page_key_round_trips_through_transport_encoding() {
        let key = PageKey {
            data_hora: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
            ticket_id: "abc-123".to_string(),
        };

        let encoded = key.encode();
        assert!(!encoded.contains('='), "cursor must be URL-safe without padding");
        assert_eq!(PageKey::decode(&encoded).unwrap(), key);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(
            PageKey::decode("not/base64!"),
            Err(DomainError::Validation("invalid page key".to_string()))
        );

        // Valid base64 that is not the expected JSON blob.
        let bogus = URL_SAFE_NO_PAD.encode(b"{\"foo\": 1}");
        assert!(PageKey::decode(&bogus).is_err());
    }
}
