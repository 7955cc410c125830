//! Data models for fitdash commands and services
//!
//! This module organizes the data transfer structs shared between the API
//! client, the services and the command layer.

pub mod metric;
pub mod participant;
pub mod series;
pub mod adherence;
pub mod notify;
pub mod ping;

// Re-export commonly used types for convenience
pub use metric::Metric;
pub use participant::Participant;
pub use series::{DisplayPoint, RawSample, SeriesResponse, SeriesSummary};
pub use adherence::{AdherenceReport, LowAdherence};
pub use notify::{NotifyRequest, NotifyResult};
pub use ping::PingMetrics;
