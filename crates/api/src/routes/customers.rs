//! Customer command and query endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::CustomerCommandHandler;
use event_store::EventStore;
use projections::{CustomerQueryHandler, CustomerView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: EventStore> {
    pub commands: CustomerCommandHandler<S>,
    pub queries: CustomerQueryHandler<S>,
}

impl<S: EventStore + Clone> AppState<S> {
    /// Builds command and query handlers over one shared store.
    pub fn new(event_store: S) -> Self {
        Self {
            commands: CustomerCommandHandler::new(event_store.clone()),
            queries: CustomerQueryHandler::new(event_store),
        }
    }
}

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    pub email_address: String,
    pub given_name: String,
    pub family_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmEmailAddressRequest {
    pub confirmation_hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailAddressRequest {
    pub email_address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNameRequest {
    pub given_name: String,
    pub family_name: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct CustomerRegisteredResponse {
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub email_address: String,
    pub is_email_address_confirmed: bool,
    pub given_name: String,
    pub family_name: String,
    pub version: i64,
}

impl From<CustomerView> for CustomerResponse {
    fn from(view: CustomerView) -> Self {
        Self {
            email_address: view.email_address,
            is_email_address_confirmed: view.is_email_address_confirmed,
            given_name: view.given_name,
            family_name: view.family_name,
            version: view.version,
        }
    }
}

// -- Handlers --

/// POST /customers: register a new customer.
#[tracing::instrument(skip(state, req))]
pub async fn register<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerRegisteredResponse>), ApiError> {
    let customer_id = state
        .commands
        .register_customer(&req.email_address, &req.given_name, &req.family_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerRegisteredResponse {
            id: customer_id.to_string(),
        }),
    ))
}

/// POST /customers/{id}/email-address/confirmation: confirm the email address.
#[tracing::instrument(skip(state, req))]
pub async fn confirm_email_address<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ConfirmEmailAddressRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .commands
        .confirm_customer_email_address(&id, &req.confirmation_hash)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /customers/{id}/email-address: change the email address.
#[tracing::instrument(skip(state, req))]
pub async fn change_email_address<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ChangeEmailAddressRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .commands
        .change_customer_email_address(&id, &req.email_address)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /customers/{id}/name: change the person name.
#[tracing::instrument(skip(state, req))]
pub async fn change_name<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ChangeNameRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .commands
        .change_customer_name(&id, &req.given_name, &req.family_name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /customers/{id}: delete the customer and release its email address.
#[tracing::instrument(skip(state))]
pub async fn delete<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.commands.delete_customer(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /customers/{id}: current view of a customer.
#[tracing::instrument(skip(state))]
pub async fn get<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let view = state.queries.customer_view_by_id(&id).await?;

    Ok(Json(view.into()))
}
