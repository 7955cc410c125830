use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::models::{DisplayPoint, RawSample, SeriesResponse, SeriesSummary};

const LABEL_FORMAT: &str = "%m-%d %H:%M";

/// Series shaping errors
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("Malformed series: {timestamps} timestamps, {values} values, {imputed} imputed flags")]
    MalformedSeries {
        timestamps: usize,
        values: usize,
        imputed: usize,
    },
}

/// Zip the three parallel arrays of a `/data` response into samples.
///
/// A response without an `imputed` array means nothing was imputed; any
/// array that is present must match the timestamp count exactly.
pub fn samples_from_parts(
    timestamps: &[String],
    values: &[Option<f64>],
    imputed: Option<&[bool]>,
) -> Result<Vec<RawSample>, SeriesError> {
    let imputed_len = imputed.map_or(timestamps.len(), |flags| flags.len());
    if values.len() != timestamps.len() || imputed_len != timestamps.len() {
        return Err(SeriesError::MalformedSeries {
            timestamps: timestamps.len(),
            values: values.len(),
            imputed: imputed_len,
        });
    }

    Ok(timestamps
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (timestamp, value))| RawSample {
            timestamp: timestamp.clone(),
            value: *value,
            is_imputed: imputed.is_some_and(|flags| flags[i]),
        })
        .collect())
}

pub fn samples_from_response(response: &SeriesResponse) -> Result<Vec<RawSample>, SeriesError> {
    samples_from_parts(&response.timestamps, &response.values, response.imputed.as_deref())
}

/// Shape samples for display. Only the run of imputed samples after the
/// last real sample gets a marker; earlier imputed samples stay on the line
/// unmarked. Samples are expected in ascending timestamp order.
pub fn process(samples: &[RawSample]) -> Vec<DisplayPoint> {
    let last_real = samples.iter().rposition(|s| !s.is_imputed);

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| DisplayPoint {
            timestamp_iso: sample.timestamp.clone(),
            label: format_label(&sample.timestamp),
            value: sample.value,
            is_imputed: sample.is_imputed,
            show_imputed_marker: sample.is_imputed && last_real.map_or(true, |last| i > last),
        })
        .collect()
}

/// Validate and shape a `/data` response in one step
pub fn process_response(response: &SeriesResponse) -> Result<Vec<DisplayPoint>, SeriesError> {
    Ok(process(&samples_from_response(response)?))
}

/// Render an ISO-8601 timestamp as `MM-DD HH:MM` in the wall clock it was
/// sent in. Unparsable input is shown verbatim.
pub fn format_label(timestamp: &str) -> String {
    let trimmed = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.naive_local().format(LABEL_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format(LABEL_FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.format(LABEL_FORMAT).to_string())
            .unwrap_or_else(|| trimmed.to_string());
    }

    timestamp.to_string()
}

pub fn summarize(points: &[DisplayPoint]) -> SeriesSummary {
    let values: Vec<f64> = points.iter().filter_map(|p| p.value).collect();

    let min = values.iter().copied().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |m| m.min(v)))
    });
    let max = values.iter().copied().fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |m| m.max(v)))
    });
    let mean = if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    };

    SeriesSummary {
        total: points.len(),
        plottable: values.len(),
        imputed: points.iter().filter(|p| p.is_imputed).count(),
        trailing_imputed: points.iter().filter(|p| p.show_imputed_marker).count(),
        min,
        max,
        mean,
    }
}
