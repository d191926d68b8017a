//! webvh server - reference registrar and resolver for did:webvh attested resources
//!
//! Accepts secured resources over `POST /resources`, checks their content
//! address and did:key proofs, and serves them back by identifier.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::ServerConfig;
pub use error::AppError;
pub use routes::create_router;
pub use store::ResourceStore;
