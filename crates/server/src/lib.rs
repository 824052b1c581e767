//! Rulebook QA service: retrieval-augmented question answering over a
//! precomputed vector index, answered by an external completion API.

pub mod config;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
