use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::AppError;
use std::sync::Arc;
use tracing::debug;

use crate::db::query::{MessageQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::StoredMessage;
use crate::state::AppState;
use crate::utils::is_valid_event_time;

#[derive(Debug, Deserialize)]
pub struct ListMessagesParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub from: Option<String>,
    pub since: Option<String>,
    pub q: Option<String>,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub data: Vec<StoredMessage>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl ListMessagesParams {
    /// Range checks happen here; the engine would silently clamp instead.
    fn into_query(self) -> Result<MessageQuery, AppError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.limit) || self.offset < 0 {
            return Err(AppError::validation("validation error"));
        }
        // Presente pero vacío también es inválido
        if let Some(since) = self.since.as_deref() {
            if !is_valid_event_time(since) {
                return Err(AppError::validation("invalid since"));
            }
        }

        Ok(MessageQuery {
            limit: self.limit,
            offset: self.offset,
            from: self.from,
            since: self.since,
            text_contains: self.q,
        })
    }
}

/// GET /messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListMessagesParams>, QueryRejection>,
) -> Result<Json<ListMessagesResponse>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        debug!("Rejected /messages query: {}", rejection);
        AppError::validation("validation error")
    })?;
    let query = params.into_query()?;

    let page = state.store.query(&query).await?;

    Ok(Json(ListMessagesResponse {
        data: page.data,
        total: page.total,
        limit: query.limit,
        offset: query.offset,
    }))
}
