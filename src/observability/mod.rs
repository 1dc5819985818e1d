pub mod endpoints;
pub mod logging;
pub mod metrics;
pub mod middleware;

pub use endpoints::*;
pub use logging::init_tracing;
pub use metrics::*;
pub use middleware::*;
