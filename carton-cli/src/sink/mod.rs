//! Remote sheet sink: submission of result tables and read-back for the dashboard
//!
//! The sink is an append-only store behind a single web endpoint. Writes are
//! one JSON POST per run; reads are `GET ?action=...` queries.

pub mod client;
pub mod error;
pub mod models;

pub use client::HttpSink;
pub use error::SinkError;
pub use models::{Ack, Envelope};

use async_trait::async_trait;

/// Destination for a run's result tables
#[async_trait]
pub trait Sink: Send + Sync {
    /// Submit both tables in a single request; one attempt, no retry
    async fn submit(&self, envelope: &Envelope) -> Result<Ack, SinkError>;
}
