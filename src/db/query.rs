// ============================================================================
// MESSAGE QUERIES - filtered, deterministic pagination
// ============================================================================

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{MessagesPage, StoredMessage};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Filters and window for `GET /messages`.
///
/// Empty filter strings behave like absent filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub limit: i64,
    pub offset: i64,
    /// Exact match on the sender.
    pub from: Option<String>,
    /// Inclusive lower bound on the event timestamp.
    pub since: Option<String>,
    /// Case-insensitive substring of the body.
    pub text_contains: Option<String>,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0)
    }
}

impl MessageQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset,
            from: None,
            since: None,
            text_contains: None,
        }
    }

    pub fn from_sender(mut self, sender: impl Into<String>) -> Self {
        self.from = Some(sender.into());
        self
    }

    pub fn since(mut self, ts: impl Into<String>) -> Self {
        self.since = Some(ts.into());
        self
    }

    pub fn containing(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self
    }

    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }

    fn active(value: &Option<String>) -> Option<String> {
        value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// Appends the WHERE clause shared by the count and the page query.
    fn push_filters(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        let mut first = true;

        if let Some(from) = Self::active(&self.from) {
            push_clause(builder, &mut first);
            builder.push("from_msisdn = ").push_bind(from);
        }
        if let Some(since) = Self::active(&self.since) {
            push_clause(builder, &mut first);
            builder.push("ts >= ").push_bind(since);
        }
        if let Some(needle) = Self::active(&self.text_contains) {
            // lower() en SQLite solo pliega ASCII, así que el needle también
            push_clause(builder, &mut first);
            builder
                .push("instr(lower(text), ")
                .push_bind(needle.to_ascii_lowercase())
                .push(") > 0");
        }
    }
}

fn push_clause(builder: &mut QueryBuilder<'_, Sqlite>, first: &mut bool) {
    builder.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

/// Count and page come from the same read transaction.
pub(crate) async fn run_query(
    pool: &SqlitePool,
    params: &MessageQuery,
) -> Result<MessagesPage, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM messages");
    params.push_filters(&mut count);
    let total: i64 = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

    let mut page = QueryBuilder::<Sqlite>::new(
        "SELECT message_id, from_msisdn, to_msisdn, ts, text, created_at FROM messages",
    );
    params.push_filters(&mut page);
    page.push(" ORDER BY ts ASC, message_id ASC LIMIT ")
        .push_bind(params.effective_limit())
        .push(" OFFSET ")
        .push_bind(params.effective_offset());
    let data: Vec<StoredMessage> = page.build_query_as::<StoredMessage>().fetch_all(&mut *tx).await?;

    tx.commit().await?;
    Ok(MessagesPage { data, total })
}
