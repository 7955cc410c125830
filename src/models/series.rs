//! Time series models

use serde::{Deserialize, Serialize};

/// Body of `GET /data`: three parallel arrays of equal length
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub timestamps: Vec<String>,
    pub values: Vec<Option<f64>>,
    /// Older deployments of the read-API do not send this array at all
    #[serde(default)]
    pub imputed: Option<Vec<bool>>,
}

/// One reading as received, before any display shaping
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: String,
    pub value: Option<f64>,
    pub is_imputed: bool,
}

/// A reading ready to be plotted
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPoint {
    pub timestamp_iso: String,
    pub label: String,
    pub value: Option<f64>,
    pub is_imputed: bool,
    pub show_imputed_marker: bool,
}

/// Aggregate figures shown under the chart
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub total: usize,
    pub plottable: usize,
    pub imputed: usize,
    pub trailing_imputed: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}
