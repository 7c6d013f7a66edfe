use serde::{Deserialize, Serialize};

/// Recorded result per scored round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: usize,
    pub reaction_time_ns: u64,
    pub timestamp_ns: u64,
}

impl RoundResult {
    pub fn reaction_ms(&self) -> u64 {
        self.reaction_time_ns / 1_000_000
    }

    /// Text shown on the feed after a hit
    pub fn display_text(&self) -> String {
        format!("{} ms", self.reaction_ms())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub rounds: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl SessionSummary {
    pub fn from_results(results: &[RoundResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let times: Vec<f64> = results
            .iter()
            .map(|r| r.reaction_time_ns as f64 / 1_000_000.0)
            .collect();

        let mean = times.iter().sum::<f64>() / times.len() as f64;
        let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            rounds: results.len(),
            mean_ms: mean,
            min_ms: min,
            max_ms: max,
        })
    }
}
