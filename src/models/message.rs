use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A message that passed every payload rule and is ready for insertion.
///
/// Only `webhook::validation` constructs this type, so holding one means the
/// addresses, timestamp and text length were already checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMessage {
    pub(crate) message_id: String,
    pub(crate) from_msisdn: String,
    pub(crate) to_msisdn: String,
    pub(crate) ts: String,
    pub(crate) text: Option<String>,
}

impl ValidatedMessage {
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn from_msisdn(&self) -> &str {
        &self.from_msisdn
    }

    pub fn to_msisdn(&self) -> &str {
        &self.to_msisdn
    }

    pub fn ts(&self) -> &str {
        &self.ts
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Duplicate,
}

impl InsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertOutcome::Created => "created",
            InsertOutcome::Duplicate => "duplicate",
        }
    }
}

/// Row of the `messages` table, also the item shape of `GET /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StoredMessage {
    pub message_id: String,
    pub from_msisdn: String,
    pub to_msisdn: String,
    pub ts: String,
    pub text: Option<String>,
    pub created_at: String,
}

/// One page of the filtered result set plus the size of the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagesPage {
    pub data: Vec<StoredMessage>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SenderCount {
    #[serde(rename = "from")]
    #[sqlx(rename = "from_msisdn")]
    pub sender: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_messages: i64,
    pub senders_count: i64,
    pub messages_per_sender: Vec<SenderCount>,
    pub first_message_ts: Option<String>,
    pub last_message_ts: Option<String>,
}
