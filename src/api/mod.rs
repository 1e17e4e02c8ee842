//! HTTP interface: coordinate conversion, interpolation and station enrichment

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
