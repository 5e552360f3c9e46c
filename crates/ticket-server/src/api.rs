use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use std::sync::Arc;

use application::SearchParams;
use domain::{DomainError, PageKey, TicketFields};
use tower_http::cors::{Any, CorsLayer};

use crate::auth::require_auth;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let ticket_routes = Router::new()
        .route("/api/tickets", post(create_ticket).get(list_tickets))
        .route("/api/tickets/search", get(search_tickets))
        .route(
            "/api/tickets/{ticketId}",
            put(update_ticket).delete(delete_ticket),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .merge(ticket_routes)
        .layer(cors)
        .with_state(state)
}

/// Error response carrying the status and the client-facing message.
///
/// Infrastructure details never reach the client: the `Store` arm logs them
/// and answers with the generic message of the route that failed.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Token inválido ou ausente.")
    }

    /// Map a service error, substituting `store_msg` for infrastructure
    /// failures.
    fn of(err: DomainError, store_msg: &str) -> Self {
        match err {
            DomainError::Store(detail) => {
                tracing::error!(error = %detail, "{}", store_msg);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, store_msg)
            }
            other => Self::from(other),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            DomainError::InvalidDateFormat(raw) => Self::new(
                StatusCode::BAD_REQUEST,
                format!("Data inválida: {raw}. Use o formato AAAA-MM-DD."),
            ),
            DomainError::InvalidCredentials => {
                Self::new(StatusCode::BAD_REQUEST, "Credenciais inválidas.")
            }
            DomainError::AccountDisabled => Self::new(
                StatusCode::FORBIDDEN,
                "Usuário desativado. Entre em contato com o administrador.",
            ),
            DomainError::Unauthenticated(reason) => {
                tracing::debug!(%reason, "token rejected");
                Self::new(StatusCode::UNAUTHORIZED, "Token inválido ou expirado.")
            }
            DomainError::DuplicateUser(email) => {
                tracing::debug!(%email, "duplicate registration");
                Self::new(StatusCode::CONFLICT, "Usuário já cadastrado.")
            }
            DomainError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "Ticket não encontrado.")
            }
            DomainError::Store(detail) => {
                tracing::error!(error = %detail, "store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(serde::Deserialize)]
struct RegisterRequest {
    email: String,
    username: String,
    password: String,
}

#[derive(serde::Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(serde::Deserialize)]
struct ListQuery {
    limit: Option<u32>,
    #[serde(rename = "lastEvaluatedKey")]
    last_evaluated_key: Option<String>,
}

#[derive(serde::Deserialize)]
struct SearchQuery {
    #[serde(rename = "clientName")]
    client_name: Option<String>,
    #[serde(rename = "ticketID")]
    ticket_id: Option<String>,
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .auth
        .register(&body.email, &body.username, &body.password)
        .await
        .map_err(|e| ApiError::of(e, "Erro ao registrar usuário."))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Usuário registrado com sucesso!" })),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state
        .auth
        .login(&body.email, &body.password)
        .await
        .map_err(|e| ApiError::of(e, "Erro ao efetuar login."))?;

    Ok(Json(json!({
        "token": outcome.token,
        "username": outcome.username,
    })))
}

async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<TicketFields>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .tickets
        .create(fields)
        .await
        .map_err(|e| ApiError::of(e, "Erro ao criar ticket."))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Ticket criado com sucesso!" })),
    ))
}

async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let exclusive_start = query
        .last_evaluated_key
        .as_deref()
        .map(PageKey::decode)
        .transpose()?;

    let listing = state
        .tickets
        .list(query.limit, exclusive_start)
        .await
        .map_err(|e| ApiError::of(e, "Erro ao buscar tickets."))?;

    Ok(Json(json!({
        "items": listing.items,
        "lastEvaluatedKey": listing.last_evaluated_key.map(|key| key.encode()),
        "totalItems": listing.total_count,
        "totalPesoBruto": listing.totals.total_peso_bruto,
        "totalPesoLiquido": listing.totals.total_peso_liquido,
    })))
}

async fn search_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let params = SearchParams {
        client_name: query.client_name,
        ticket_id: query.ticket_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let items = state
        .tickets
        .search(params)
        .await
        .map_err(|e| ApiError::of(e, "Erro ao buscar tickets."))?;

    Ok(Json(json!({ "items": items })))
}

async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<String>,
    Json(fields): Json<TicketFields>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .tickets
        .update(&ticket_id, fields)
        .await
        .map_err(|e| ApiError::of(e, "Erro ao atualizar ticket."))?;

    Ok(Json(json!({
        "message": "Ticket atualizado com sucesso!",
        "updatedAttributes": updated,
    })))
}

async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .tickets
        .delete(&ticket_id)
        .await
        .map_err(|e| ApiError::of(e, "Erro ao deletar ticket."))?;

    Ok(Json(json!({ "message": "Ticket deletado com sucesso!" })))
}
