pub mod message;

pub use message::{
    InsertOutcome, MessagesPage, SenderCount, StatsReport, StoredMessage, ValidatedMessage,
};
