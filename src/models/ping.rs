//! Ping/status command models

/// Bot ping metrics, uptime and backend reachability
#[derive(Debug)]
pub struct PingMetrics {
    pub response_roundtrip: u64,
    pub uptime: String,
    pub backend_status: String,
    pub backend_latency: Option<u64>,
}
