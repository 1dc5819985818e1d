pub mod endpoints;

pub use endpoints::monitoring_router;
