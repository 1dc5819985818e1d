pub mod pool;
pub mod query;
pub mod stats;
pub mod store;

pub use pool::{create_pool, parse_database_url, DatabaseUrlError, SqliteLocation};
pub use query::{MessageQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use store::MessageStore;
