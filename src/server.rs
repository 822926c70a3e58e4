//! HTTP trigger surface.
//!
//! A `POST /` with fields `Source`, `Username`, `Password`, `Host`,
//! `Port` and `Folder` (form body or query string) runs one relay job. Any other method on `/` is
//! answered with `403 Forbidden`.
//!
//! | Outcome                                   | Status |
//! |-------------------------------------------|--------|
//! | job completed (per-file results in body)  | 200    |
//! | `RelayError::Validation`                  | 400    |
//! | connection, directory or internal failure | 500    |

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info, warn};
use tokio::net::TcpListener;

use crate::config::{ServiceConfig, TransferConfig};
use crate::constants::FIELD_PASSWORD;
use crate::security::scrub_secret;
use crate::transfer::{run_job, Connector, JobLocks};

/// Shared state for trigger handlers. Jobs share nothing but the lock table.
#[derive(Clone)]
pub struct RelayState {
    pub settings: Arc<ServiceConfig>,
    pub connector: Arc<dyn Connector>,
    pub locks: JobLocks,
}

impl RelayState {
    pub fn new(settings: ServiceConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            settings: Arc::new(settings),
            connector,
            locks: JobLocks::new(),
        }
    }
}

/// Build the router for the trigger endpoint.
pub fn create_router(state: RelayState) -> Router {
    Router::new()
        .route("/", post(trigger_handler).fallback(forbidden))
        .with_state(state)
}

/// Bind `addr` and serve triggers until the process is stopped.
pub async fn serve(state: RelayState, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind trigger listener on {}", addr))?;

    info!("Listening for triggers on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .await
        .context("Trigger server terminated")
}

async fn forbidden() -> StatusCode {
    StatusCode::FORBIDDEN
}

/// Resolve the form, run the job on a blocking thread, map the result.
///
/// Fields may come from the query string or the form body; the body wins
/// when both carry the same field.
pub async fn trigger_handler(
    State(state): State<RelayState>,
    Query(mut fields): Query<HashMap<String, String>>,
    Form(body): Form<HashMap<String, String>>,
) -> Response {
    fields.extend(body);
    let secret = fields.get(FIELD_PASSWORD).cloned().unwrap_or_default();

    let config = match TransferConfig::resolve(&fields) {
        Ok(config) => config,
        Err(e) => {
            warn!("Rejected trigger: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let job_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        run_job(
            &config,
            &job_state.settings,
            job_state.connector.as_ref(),
            &job_state.locks,
            None,
        )
    })
    .await;

    match result {
        Ok(Ok(report)) => {
            if report.failed_count() > 0 {
                warn!(
                    "Job {} completed with {} failed file(s)",
                    report.job_id,
                    report.failed_count()
                );
            }
            (StatusCode::OK, Json(report)).into_response()
        }
        Ok(Err(e)) => {
            let message = scrub_secret(&e.to_string(), &secret);
            error!("Relay job failed: {}", message);
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, message).into_response()
        }
        Err(e) => {
            error!("Relay job panicked or was aborted: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
