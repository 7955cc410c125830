//! Adherence models

use serde::{Deserialize, Serialize};

/// Body of `GET /adherence`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceReport {
    pub no_token: bool,
    #[serde(default)]
    pub last_upload: Option<String>,
    pub sleep_upload_pct: f64,
    pub wear_time_pct: f64,
}

/// An adherence metric that fell under the notification threshold
#[derive(Debug, Clone, PartialEq)]
pub struct LowAdherence {
    pub name: &'static str,
    pub pct: f64,
    pub threshold: f64,
}

impl AdherenceReport {
    /// Metrics strictly below `threshold`, in card order
    pub fn low_metrics(&self, threshold: f64) -> Vec<LowAdherence> {
        [
            ("sleep uploads", self.sleep_upload_pct),
            ("wear time", self.wear_time_pct),
        ]
        .into_iter()
        .filter(|(_, pct)| *pct < threshold)
        .map(|(name, pct)| LowAdherence { name, pct, threshold })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(sleep: f64, wear: f64) -> AdherenceReport {
        AdherenceReport {
            no_token: false,
            last_upload: Some("2024-01-07T08:00:00".to_string()),
            sleep_upload_pct: sleep,
            wear_time_pct: wear,
        }
    }

    #[test]
    fn test_low_metrics_strictly_below() {
        assert!(report(70.0, 70.0).low_metrics(70.0).is_empty());

        let low = report(69.9, 95.0).low_metrics(70.0);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "sleep uploads");
    }

    #[test]
    fn test_low_metrics_both() {
        let low = report(10.0, 20.0).low_metrics(70.0);
        let names: Vec<&str> = low.iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["sleep uploads", "wear time"]);
    }

    #[test]
    fn test_missing_last_upload_deserializes() {
        let report: AdherenceReport = serde_json::from_str(
            r#"{"no_token": true, "sleep_upload_pct": 50.0, "wear_time_pct": 80.5}"#,
        )
        .unwrap();
        assert!(report.no_token);
        assert_eq!(report.last_upload, None);
    }
}
