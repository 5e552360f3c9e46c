use domain::{FilterExpr, FilterValue, TicketField};
use sqlx::{Postgres, QueryBuilder};

/// Column addressed by a filter field.
fn column(field: TicketField) -> &'static str {
    match field {
        TicketField::TicketId => "ticket_id",
        TicketField::Cliente => "cliente",
        TicketField::DataHora => "data_hora",
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(text) => {
            builder.push_bind(text.clone());
        }
        FilterValue::Timestamp(ts) => {
            builder.push_bind(*ts);
        }
    }
}

/// Append the SQL predicate for `expr`, binding every operand.
///
/// Containment uses POSITION so the needle is matched literally and
/// case-sensitively, with no LIKE-escaping concerns. A NULL column makes
/// the predicate unknown, which the store treats as no match - the same
/// outcome as [`FilterExpr::matches`] on an absent field.
pub(crate) fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, expr: &FilterExpr) {
    match expr {
        FilterExpr::Contains { field, needle } => {
            builder.push("POSITION(");
            builder.push_bind(needle.clone());
            builder.push(" IN ");
            builder.push(column(*field));
            builder.push(") > 0");
        }
        FilterExpr::Eq { field, value } => {
            builder.push(column(*field));
            builder.push(" = ");
            push_value(builder, value);
        }
        FilterExpr::Between {
            field,
            lower,
            upper,
        } => {
            builder.push(column(*field));
            builder.push(" BETWEEN ");
            push_value(builder, lower);
            builder.push(" AND ");
            push_value(builder, upper);
        }
        FilterExpr::And(parts) => push_composite(builder, parts, " AND ", "TRUE"),
        FilterExpr::Or(parts) => push_composite(builder, parts, " OR ", "FALSE"),
    }
}

fn push_composite(
    builder: &mut QueryBuilder<'_, Postgres>,
    parts: &[FilterExpr],
    joiner: &str,
    empty: &str,
) {
    if parts.is_empty() {
        builder.push(empty);
        return;
    }

    builder.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            builder.push(joiner);
        }
        push_filter(builder, part);
    }
    builder.push(")");
}
