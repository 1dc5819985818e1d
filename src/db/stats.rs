use sqlx::SqlitePool;

use crate::models::{SenderCount, StatsReport};

/// Size of the `messages_per_sender` leaderboard.
pub const TOP_SENDERS: i64 = 10;

#[derive(Debug, sqlx::FromRow)]
struct Totals {
    total_messages: i64,
    senders_count: i64,
    first_message_ts: Option<String>,
    last_message_ts: Option<String>,
}

/// Aggregates over the whole table, read inside one transaction.
pub(crate) async fn collect_stats(pool: &SqlitePool) -> Result<StatsReport, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let totals: Totals = sqlx::query_as(
        r#"
        SELECT COUNT(*)                    AS total_messages,
               COUNT(DISTINCT from_msisdn) AS senders_count,
               MIN(ts)                     AS first_message_ts,
               MAX(ts)                     AS last_message_ts
        FROM messages
        "#,
    )
    .fetch_one(&mut *tx)
    .await?;

    let messages_per_sender: Vec<SenderCount> = sqlx::query_as(
        r#"
        SELECT from_msisdn, COUNT(*) AS count
        FROM messages
        GROUP BY from_msisdn
        ORDER BY count DESC, from_msisdn ASC
        LIMIT ?
        "#,
    )
    .bind(TOP_SENDERS)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(StatsReport {
        total_messages: totals.total_messages,
        senders_count: totals.senders_count,
        messages_per_sender,
        first_message_ts: totals.first_message_ts,
        last_message_ts: totals.last_message_ts,
    })
}
