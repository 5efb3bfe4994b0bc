// HTTP access to the NLP analysis service: typed models, the reqwest client,
// and the `NlpBackend` seam the orchestrator talks to.

pub mod client;
pub mod models;

pub use client::{ApiError, NlpBackend, NlpClient};
