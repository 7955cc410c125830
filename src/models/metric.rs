//! Physiological metrics served by the read-API

use std::fmt;
use std::str::FromStr;

/// A metric selectable on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    #[default]
    HeartRate,
    ActiveZoneMinutes,
    BreathingRate,
    HeartRateVariability,
    Spo2,
    Activity,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::HeartRate,
        Metric::ActiveZoneMinutes,
        Metric::BreathingRate,
        Metric::HeartRateVariability,
        Metric::Spo2,
        Metric::Activity,
    ];

    /// Query-string key expected by `/data`
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::HeartRate => "hr",
            Metric::ActiveZoneMinutes => "azm",
            Metric::BreathingRate => "br",
            Metric::HeartRateVariability => "hrv",
            Metric::Spo2 => "spo2",
            Metric::Activity => "activity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Heart rate",
            Metric::ActiveZoneMinutes => "Active zone minutes",
            Metric::BreathingRate => "Breathing rate",
            Metric::HeartRateVariability => "Heart rate variability",
            Metric::Spo2 => "Blood oxygen saturation",
            Metric::Activity => "Activity",
        }
    }

    /// Axis unit, empty when the backend reports a unitless count
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::HeartRate => "bpm",
            Metric::ActiveZoneMinutes => "min",
            Metric::BreathingRate => "breaths/min",
            Metric::HeartRateVariability => "ms",
            Metric::Spo2 => "%",
            Metric::Activity => "",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Metric::ALL.iter().map(|m| m.as_str()).collect();
                format!("❌ Unknown metric: '{}'. Supported: {}", s, known.join(", "))
            })
    }
}
