use crate::database::expression::push_filter;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    ALL_TICKETS_MARKER, DomainError, FilterExpr, PageKey, TOTALS_RECORD_ID, Ticket, TicketFields,
    TicketPage, TicketRepository, WeightTotals,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const TICKET_COLUMNS: &str = "ticket_id, data_hora, mtr, cliente, produto, operador, placa, \
                              \"local\", peso_bruto, peso_liquido, tara, all_tickets";

#[derive(Clone)]
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn store_err(e: sqlx::Error) -> DomainError {
        DomainError::Store(format!("Database error: {}", e))
    }

    fn row_to_ticket(row: &PgRow) -> Ticket {
        Ticket {
            ticket_id: row.get("ticket_id"),
            data_hora: row.get("data_hora"),
            mtr: row.get("mtr"),
            fields: TicketFields {
                cliente: row.get("cliente"),
                produto: row.get("produto"),
                operador: row.get("operador"),
                placa: row.get("placa"),
                local: row.get("local"),
                peso_bruto: row.get("peso_bruto"),
                peso_liquido: row.get("peso_liquido"),
                tara: row.get("tara"),
            },
            all_tickets: row.get("all_tickets"),
        }
    }

    /// Fetch one keyset page ordered newest-first, peeking one row past
    /// `limit` to decide whether a continuation key exists.
    async fn fetch_page(
        &self,
        filter: Option<&FilterExpr>,
        exclusive_start: Option<PageKey>,
        limit: u32,
    ) -> Result<TicketPage, DomainError> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE all_tickets = "
        ));
        builder.push_bind(ALL_TICKETS_MARKER);

        if let Some(filter) = filter {
            builder.push(" AND ");
            push_filter(&mut builder, filter);
        }

        if let Some(start) = &exclusive_start {
            builder.push(" AND (data_hora, ticket_id) < (");
            builder.push_bind(start.data_hora);
            builder.push(", ");
            builder.push_bind(start.ticket_id.clone());
            builder.push(")");
        }

        builder.push(" ORDER BY data_hora DESC, ticket_id DESC LIMIT ");
        builder.push_bind(i64::from(limit) + 1);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(Self::store_err)?;

        let has_more = rows.len() > limit as usize;
        let items: Vec<Ticket> = rows
            .iter()
            .take(limit as usize)
            .map(Self::row_to_ticket)
            .collect();
        let last_evaluated_key = if has_more {
            items.last().map(PageKey::of)
        } else {
            None
        };

        Ok(TicketPage {
            items,
            last_evaluated_key,
        })
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn put(&self, ticket: &Ticket) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tickets
                (ticket_id, data_hora, mtr, cliente, produto, operador, placa, "local",
                 peso_bruto, peso_liquido, tara, all_tickets)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&ticket.ticket_id)
        .bind(ticket.data_hora)
        .bind(ticket.mtr)
        .bind(&ticket.fields.cliente)
        .bind(&ticket.fields.produto)
        .bind(&ticket.fields.operador)
        .bind(&ticket.fields.placa)
        .bind(&ticket.fields.local)
        .bind(ticket.fields.peso_bruto)
        .bind(ticket.fields.peso_liquido)
        .bind(ticket.fields.tara)
        .bind(&ticket.all_tickets)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err)?;

        Ok(())
    }

    async fn page_by_date(
        &self,
        limit: u32,
        exclusive_start: Option<PageKey>,
    ) -> Result<TicketPage, DomainError> {
        self.fetch_page(None, exclusive_start, limit).await
    }

    async fn count_all(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM tickets WHERE all_tickets = $1")
            .bind(ALL_TICKETS_MARKER)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::store_err)?;

        let total: i64 = row.get("total");
        Ok(total as u64)
    }

    async fn scan(
        &self,
        filter: &FilterExpr,
        exclusive_start: Option<PageKey>,
        page_size: u32,
    ) -> Result<TicketPage, DomainError> {
        self.fetch_page(Some(filter), exclusive_start, page_size)
            .await
    }

    async fn find_data_hora(
        &self,
        ticket_id: &str,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        let row = sqlx::query("SELECT data_hora FROM tickets WHERE ticket_id = $1 LIMIT 1")
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::store_err)?;

        Ok(row.map(|r| r.get("data_hora")))
    }

    async fn update_fields(
        &self,
        ticket_id: &str,
        data_hora: DateTime<Utc>,
        fields: &TicketFields,
    ) -> Result<TicketFields, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE tickets
            SET cliente = $1, produto = $2, operador = $3, placa = $4, "local" = $5,
                peso_bruto = $6, peso_liquido = $7, tara = $8
            WHERE ticket_id = $9 AND data_hora = $10
            RETURNING cliente, produto, operador, placa, "local", peso_bruto, peso_liquido, tara
            "#,
        )
        .bind(&fields.cliente)
        .bind(&fields.produto)
        .bind(&fields.operador)
        .bind(&fields.placa)
        .bind(&fields.local)
        .bind(fields.peso_bruto)
        .bind(fields.peso_liquido)
        .bind(fields.tara)
        .bind(ticket_id)
        .bind(data_hora)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::store_err)?;

        match row {
            Some(row) => Ok(TicketFields {
                cliente: row.get("cliente"),
                produto: row.get("produto"),
                operador: row.get("operador"),
                placa: row.get("placa"),
                local: row.get("local"),
                peso_bruto: row.get("peso_bruto"),
                peso_liquido: row.get("peso_liquido"),
                tara: row.get("tara"),
            }),
            None => Err(DomainError::NotFound(format!("ticket {ticket_id}"))),
        }
    }

    async fn delete(&self, ticket_id: &str, data_hora: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM tickets WHERE ticket_id = $1 AND data_hora = $2")
            .bind(ticket_id)
            .bind(data_hora)
            .execute(&self.pool)
            .await
            .map_err(Self::store_err)?;

        Ok(())
    }

    async fn add_to_totals(&self, peso_bruto: f64, peso_liquido: f64) -> Result<(), DomainError> {
        // Server-side increment: safe under concurrent ticket creation.
        sqlx::query(
            r#"
            INSERT INTO weight_totals (id, total_peso_bruto, total_peso_liquido)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET total_peso_bruto = weight_totals.total_peso_bruto + EXCLUDED.total_peso_bruto,
                total_peso_liquido = weight_totals.total_peso_liquido + EXCLUDED.total_peso_liquido
            "#,
        )
        .bind(TOTALS_RECORD_ID)
        .bind(peso_bruto)
        .bind(peso_liquido)
        .execute(&self.pool)
        .await
        .map_err(Self::store_err)?;

        Ok(())
    }

    async fn fetch_totals(&self) -> Result<Option<WeightTotals>, DomainError> {
        let row = sqlx::query(
            "SELECT total_peso_bruto, total_peso_liquido FROM weight_totals WHERE id = $1",
        )
        .bind(TOTALS_RECORD_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::store_err)?;

        Ok(row.map(|r| WeightTotals {
            total_peso_bruto: r.get("total_peso_bruto"),
            total_peso_liquido: r.get("total_peso_liquido"),
        }))
    }
}
